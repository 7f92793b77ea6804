use crate::error::{PersistError, Result};
use crate::model::Roster;
use crate::normalize;
use std::path::{Path, PathBuf};

/// The canonical backend: a full-model JSON snapshot, rewritten whole on
/// every save.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(&self) -> Result<Option<Roster>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let doc: serde_json::Value = serde_json::from_str(&data)?;
        let roster = normalize::from_document(&doc)?;
        tracing::debug!(path = %self.path.display(), people = roster.people.len(), "loaded roster");
        Ok(Some(roster))
    }

    /// Failures to write surface as [`PersistError::Local`].
    pub fn save(&self, roster: &Roster) -> Result<()> {
        let data = serde_json::to_string_pretty(roster)?;
        crate::io::atomic_write(&self.path, data.as_bytes()).map_err(|e| PersistError::Local {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %self.path.display(), "saved roster");
        Ok(())
    }
}
