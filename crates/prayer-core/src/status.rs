//! Out-of-band run flag shared between the control surface and the
//! background listener. Stored as `{"running": bool}`.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RunStatus {
    /// Read the flag. A missing or unreadable file means "not running".
    pub fn load(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_json::from_str::<RunStatus>(&data).ok());
        parsed.unwrap_or(RunStatus {
            running: false,
            updated_at: None,
        })
    }

    pub fn write(path: &Path, running: bool) -> Result<()> {
        let status = RunStatus {
            running,
            updated_at: Some(Utc::now()),
        };
        let data = serde_json::to_string(&status)?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

pub fn is_running(path: &Path) -> bool {
    RunStatus::load(path).running
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_not_running() {
        let dir = TempDir::new().unwrap();
        assert!(!is_running(&dir.path().join("bot_status.json")));
    }

    #[test]
    fn garbage_file_is_not_running() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot_status.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(!is_running(&path));
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot_status.json");
        RunStatus::write(&path, true).unwrap();
        assert!(is_running(&path));
        RunStatus::write(&path, false).unwrap();
        assert!(!is_running(&path));
    }

    #[test]
    fn reads_minimal_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot_status.json");
        std::fs::write(&path, r#"{"running": true}"#).unwrap();
        let status = RunStatus::load(&path);
        assert!(status.running);
        assert!(status.updated_at.is_none());
    }
}
