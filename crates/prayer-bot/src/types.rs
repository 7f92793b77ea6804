use serde::{Deserialize, Serialize};

// ─── Bot API envelopes ────────────────────────────────────────────────────

/// Every Bot API method answers `{"ok": bool, "result": ..., "description": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    /// Set when the mini app called `Telegram.WebApp.sendData`.
    #[serde(default)]
    pub web_app_data: Option<WebAppData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebAppData {
    pub data: String,
    #[serde(default)]
    pub button_text: String,
}

// ─── Outbound ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub web_app: WebAppInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebAppInfo {
    pub url: String,
}

impl InlineKeyboardMarkup {
    /// A single button that opens the mini app.
    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: text.into(),
                web_app: WebAppInfo { url: url.into() },
            }]],
        }
    }
}

// ─── Commands ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    List,
    Status,
    Help,
}

impl Command {
    /// Parse `/cmd` or `/cmd@botname` at the start of a message. Anything
    /// else, including unknown commands, is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name {
            "start" => Some(Command::Start),
            "list" => Some(Command::List),
            "status" => Some(Command::Status),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}
