use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use prayer_core::status::{self, RunStatus};
use prayer_core::Session;
use tokio::task::JoinHandle;

use crate::client::TelegramClient;
use crate::handler::{handle_message, Reply};
use crate::types::Message;
use crate::{BotError, Result};

// ─── Listener ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub poll_interval: Duration,
    pub mini_app_url: String,
    /// `{"running": bool}` file. Flipping it to false stops the listener on
    /// its next tick.
    pub status_path: PathBuf,
}

/// Long-lived background task: polls for updates on a fixed tick and
/// answers them through a shared [`Session`].
pub struct Listener {
    client: TelegramClient,
    session: Arc<Mutex<Session>>,
    config: ListenerConfig,
}

/// Handle to a spawned listener. Shutdown is cooperative: signal, then join.
pub struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    join: JoinHandle<Result<()>>,
}

impl Listener {
    pub fn new(client: TelegramClient, session: Session, config: ListenerConfig) -> Self {
        Self {
            client,
            session: Arc::new(Mutex::new(session)),
            config,
        }
    }

    /// Mark the status file running and start the poll loop.
    pub fn spawn(self) -> Result<ListenerHandle> {
        RunStatus::write(&self.config.status_path, true)?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let join = tokio::spawn(async move { self.run(flag).await });
        Ok(ListenerHandle { shutdown, join })
    }

    async fn run(self, shutdown: Arc<AtomicBool>) -> Result<()> {
        tracing::info!(
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "bot listener started"
        );
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut offset: Option<i64> = None;

        loop {
            ticker.tick().await;
            if shutdown.load(Ordering::Relaxed) {
                tracing::info!("shutdown requested");
                break;
            }
            if !status::is_running(&self.config.status_path) {
                tracing::info!("status file cleared, stopping");
                break;
            }

            let updates = match self.client.get_updates(offset, 0).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed");
                    continue;
                }
            };
            for update in updates {
                offset = Some(update.update_id + 1);
                if let Some(message) = update.message {
                    self.dispatch(message).await;
                }
            }
        }

        let Listener {
            session, config, ..
        } = self;
        // The session may own a blocking HTTP client; release it off the runtime.
        let _ = tokio::task::spawn_blocking(move || drop(session)).await;
        RunStatus::write(&config.status_path, false)?;
        tracing::info!("bot listener stopped");
        Ok(())
    }

    async fn dispatch(&self, message: Message) {
        let chat_id = message.chat.id;
        let session = Arc::clone(&self.session);
        let url = self.config.mini_app_url.clone();
        let reply = tokio::task::spawn_blocking(move || -> Option<Reply> {
            let mut session = session.lock().unwrap_or_else(|p| p.into_inner());
            handle_message(&mut session, &message, &url)
        })
        .await;

        let reply = match reply {
            Ok(Some(reply)) => reply,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(error = %e, "message handler panicked");
                return;
            }
        };
        if let Err(e) = self
            .client
            .send_message(chat_id, &reply.text, reply.markdown, reply.markup.as_ref())
            .await
        {
            tracing::warn!(chat = chat_id, error = %e, "sendMessage failed");
        }
    }
}

impl ListenerHandle {
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the loop and wait for it to exit. Observed on the next tick.
    pub async fn shutdown(self) -> Result<()> {
        self.request_shutdown();
        self.join().await
    }

    /// Wait for the loop to exit on its own (status file flipped).
    pub async fn join(self) -> Result<()> {
        flatten(self.join.await)
    }

    /// Run until the loop exits on its own or `interrupt` resolves, in which
    /// case shut down cleanly.
    pub async fn run_until<F: Future<Output = ()>>(self, interrupt: F) -> Result<()> {
        let ListenerHandle { shutdown, mut join } = self;
        tokio::select! {
            res = &mut join => return flatten(res),
            _ = interrupt => {
                tracing::info!("interrupted");
                shutdown.store(true, Ordering::Relaxed);
            }
        }
        flatten(join.await)
    }
}

fn flatten(res: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    res.map_err(|e| BotError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use prayer_core::config::Config;
    use tempfile::TempDir;

    fn listener(dir: &TempDir, server: &mockito::Server) -> Listener {
        let client = TelegramClient::new(&server.url(), "TOKEN").unwrap();
        let session = Session::with_mirror(dir.path(), Config::default(), None);
        Listener::new(
            client,
            session,
            ListenerConfig {
                poll_interval: Duration::from_millis(10),
                mini_app_url: "https://app.test".into(),
                status_path: dir.path().join("bot_status.json"),
            },
        )
    }

    async fn eventually(mock: &mockito::Mock) -> bool {
        for _ in 0..200 {
            if mock.matched_async().await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn answers_command_then_shuts_down() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        // first poll carries no offset
        let _first = server
            .mock("POST", "/botTOKEN/getUpdates")
            .match_body(Matcher::Regex(r#"^\{"timeout""#.into()))
            .with_body(
                r#"{"ok": true, "result": [
                    {"update_id": 7, "message": {"message_id": 1, "chat": {"id": 42}, "text": "/help"}}
                ]}"#,
            )
            .create_async()
            .await;
        let _rest = server
            .mock("POST", "/botTOKEN/getUpdates")
            .match_body(Matcher::PartialJson(serde_json::json!({"offset": 8})))
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;
        let send = server
            .mock("POST", "/botTOKEN/sendMessage")
            .match_body(Matcher::PartialJson(serde_json::json!({"chat_id": 42})))
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .create_async()
            .await;

        let status_path = dir.path().join("bot_status.json");
        let handle = listener(&dir, &server).spawn().unwrap();
        assert!(status::is_running(&status_path));

        assert!(eventually(&send).await, "reply was never sent");
        handle.shutdown().await.unwrap();
        assert!(!status::is_running(&status_path));
    }

    #[tokio::test]
    async fn stops_when_status_file_cleared() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _poll = server
            .mock("POST", "/botTOKEN/getUpdates")
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;

        let status_path = dir.path().join("bot_status.json");
        let handle = listener(&dir, &server).spawn().unwrap();
        RunStatus::write(&status_path, false).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle.join())
            .await
            .expect("listener did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn api_errors_do_not_stop_the_loop() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let poll = server
            .mock("POST", "/botTOKEN/getUpdates")
            .with_status(502)
            .with_body("bad gateway")
            .expect_at_least(2)
            .create_async()
            .await;

        let handle = listener(&dir, &server).spawn().unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!handle.is_finished());
        handle.shutdown().await.unwrap();
        poll.assert_async().await;
    }

    #[tokio::test]
    async fn run_until_interrupt_stops_cleanly() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _poll = server
            .mock("POST", "/botTOKEN/getUpdates")
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;

        let status_path = dir.path().join("bot_status.json");
        let handle = listener(&dir, &server).spawn().unwrap();
        handle
            .run_until(tokio::time::sleep(Duration::from_millis(30)))
            .await
            .unwrap();
        assert!(!status::is_running(&status_path));
    }
}
