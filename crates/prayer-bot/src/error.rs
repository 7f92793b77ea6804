use prayer_core::PrayerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot token not found: set {0}")]
    MissingToken(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error: {0}")]
    Api(String),

    #[error("Malformed mini app payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] PrayerError),

    #[error("Listener task failed: {0}")]
    Join(String),
}
