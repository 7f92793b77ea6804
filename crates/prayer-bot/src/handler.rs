//! Maps one inbound message to at most one reply. Runs on a blocking thread
//! since the session may talk to the remote sheet synchronously.

use prayer_core::{normalize, report, Session};

use crate::types::{Command, InlineKeyboardMarkup, Message};
use crate::Result;

pub const OPEN_BUTTON: &str = "🙏 Open Prayer List";

const WELCOME: &str = "Welcome to Prayer List Tracker! 🙏📿\n\n\
Click the button below to open the prayer list tracker in the Mini App!\n\n\
Track prayer cycles and see who has prayed.\n\n\
Or use these commands:\n\
/list - View current prayer list\n\
/status - Check current cycle status\n\
/help - Show help message";

const HELP: &str = "🙏 *Prayer List Tracker Help*

*Commands:*
/start - Open Mini App
/list - View full prayer list
/status - Check current cycle status
/help - Show this help message

*How it works:*
1. Click \"🙏 Open Prayer List\" to use the Mini App
2. Mark people as they pray (checkboxes)
3. When everyone in a cycle has prayed, a new cycle starts automatically
4. Track who has prayed across multiple cycles

*About Cycles:*
- Each cycle represents a prayer rotation
- When all people have prayed (all ✅), a new cycle begins
- You can manually add cycles too if needed

*Tips:*
- Use the Mini App for the best experience
- Changes save automatically
- Use /status to see who needs to pray
";

const EMPTY_LIST: &str = "📋 Prayer list is empty. Add people using the Mini App!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markdown: bool,
    pub markup: Option<InlineKeyboardMarkup>,
}

impl Reply {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: false,
            markup: None,
        }
    }

    fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
            markup: None,
        }
    }
}

/// `None` for messages the bot ignores (plain chat, unknown commands).
pub fn handle_message(session: &mut Session, message: &Message, mini_app_url: &str) -> Option<Reply> {
    if let Some(payload) = &message.web_app_data {
        return Some(apply_snapshot(session, &payload.data));
    }
    let command = Command::parse(message.text.as_deref()?)?;
    tracing::debug!(chat = message.chat.id, ?command, "command");
    Some(match command {
        Command::Start => Reply {
            markup: Some(InlineKeyboardMarkup::web_app(OPEN_BUTTON, mini_app_url)),
            ..Reply::plain(WELCOME)
        },
        Command::List => {
            let roster = session.reload();
            if roster.people.is_empty() {
                Reply::plain(EMPTY_LIST)
            } else {
                Reply::markdown(report::list_report(roster))
            }
        }
        Command::Status => {
            let roster = session.reload();
            match report::progress(roster).filter(|p| p.total > 0) {
                Some(_) => Reply::markdown(report::status_report(roster)),
                None => Reply::plain(report::status_report(roster)),
            }
        }
        Command::Help => Reply::markdown(HELP),
    })
}

/// Replace the roster with the mini app's snapshot, then advance and save.
pub fn apply_snapshot(session: &mut Session, data: &str) -> Reply {
    match import_snapshot(session, data) {
        Ok(true) => {
            Reply::plain("✅ Prayer list updated!\n🎉 Cycle complete! New cycle added automatically.")
        }
        Ok(false) => Reply::plain("✅ Prayer list updated successfully!"),
        Err(e) => {
            tracing::warn!(error = %e, "mini app snapshot rejected");
            Reply::plain(format!("❌ Error saving data: {e}"))
        }
    }
}

fn import_snapshot(session: &mut Session, data: &str) -> Result<bool> {
    let doc: serde_json::Value = serde_json::from_str(data)?;
    let roster = normalize::from_document(&doc).map_err(prayer_core::PrayerError::from)?;
    let outcome = session.import(roster)?;
    Ok(outcome.advanced.is_some())
}
