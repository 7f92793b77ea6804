//! Telegram front end for the prayer list.
//!
//! ```text
//! TelegramClient  ← getUpdates / sendMessage over the Bot API
//!     │
//!     ▼
//! Listener        ← tokio task, fixed poll tick, watches the status file
//!     │              and an AtomicBool shutdown flag
//!     ▼
//! handler         ← /start /list /status /help and mini app snapshots,
//!                    answered through a prayer_core::Session
//! ```

pub mod client;
pub mod error;
pub mod handler;
pub mod listener;
pub mod types;

pub use client::TelegramClient;
pub use error::BotError;
pub use listener::{Listener, ListenerConfig, ListenerHandle};

pub type Result<T> = std::result::Result<T, BotError>;
