use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{ApiResponse, InlineKeyboardMarkup, Update};
use crate::{BotError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── TelegramClient ───────────────────────────────────────────────────────

/// Minimal Bot API client: `getUpdates` polling and `sendMessage`.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    /// `{api_base}/bot{token}`
    base: String,
}

#[derive(Serialize)]
struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{method}", self.base))
            .json(body)
            .send()
            .await?;
        let envelope: ApiResponse<T> = response.json().await?;
        match (envelope.ok, envelope.result) {
            (true, Some(result)) => Ok(result),
            (_, _) => Err(BotError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            )),
        }
    }

    /// Pending updates after `offset`. `timeout_secs = 0` is a short poll.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: timeout_secs,
                allowed_updates: &["message"],
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markdown: bool,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        let _sent: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id,
                    text,
                    parse_mode: markdown.then_some("Markdown"),
                    reply_markup,
                },
            )
            .await?;
        Ok(())
    }
}
