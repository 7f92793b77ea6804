//! Session-scoped orchestrator. Owns the in-memory roster and wraps every
//! mutation in load-if-absent, mutate, advance, save.
//!
//! Saves are two independent writes: the local canonical file must succeed,
//! the remote mirror is best-effort and may lag behind on persistent failure.

use crate::config::{Config, SourceConfig};
use crate::error::Result;
use crate::gateway::{self, LocalStore, SheetService, SheetsClient};
use crate::model::Roster;
use crate::normalize;
use crate::paths;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of the best-effort mirror write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum MirrorStatus {
    /// No mirror configured.
    Skipped,
    Synced,
    Failed(String),
}

/// What a completed mutation did beyond the mutation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Name of the cycle appended by auto-advance, if any.
    pub advanced: Option<String>,
    pub mirror: MirrorStatus,
}

pub struct Session {
    root: PathBuf,
    config: Config,
    local: LocalStore,
    mirror: Option<Box<dyn SheetService>>,
    roster: Option<Roster>,
}

impl Session {
    /// Build a session from config. A Google Sheets source gets a live
    /// client; credentials are only checked when it is first used.
    pub fn open(root: &Path, config: Config) -> Result<Self> {
        let mirror: Option<Box<dyn SheetService>> = match config.source.mirror_sheet() {
            Some(_) => Some(Box::new(SheetsClient::from_config(&config.sheets)?)),
            None => None,
        };
        Ok(Self::with_mirror(root, config, mirror))
    }

    pub fn with_mirror(
        root: &Path,
        config: Config,
        mirror: Option<Box<dyn SheetService>>,
    ) -> Self {
        let local = LocalStore::new(paths::data_path(root, &config));
        Self {
            root: root.to_path_buf(),
            config,
            local,
            mirror,
            roster: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// The session roster, loading it on first access.
    pub fn roster(&mut self) -> &Roster {
        self.loaded()
    }

    /// Drop the in-memory roster and load again from the sources.
    pub fn reload(&mut self) -> &Roster {
        self.roster = None;
        self.loaded()
    }

    /// Reload, then advance and persist if the fresh roster has a completed
    /// cycle.
    pub fn refresh(&mut self) -> Result<Outcome> {
        self.roster = None;
        let roster = self.loaded();
        if !roster.try_advance_cycle() {
            return Ok(Outcome {
                advanced: None,
                mirror: MirrorStatus::Skipped,
            });
        }
        let advanced = roster.current_cycle().map(str::to_string);
        match self.save() {
            Ok(mirror) => Ok(Outcome { advanced, mirror }),
            Err(e) => {
                self.roster = None;
                Err(e)
            }
        }
    }

    fn loaded(&mut self) -> &mut Roster {
        if self.roster.is_none() {
            let mut roster = self.load_sources();
            roster.ensure_seeded();
            roster.materialize();
            self.roster = Some(roster);
        }
        self.roster.get_or_insert_with(Roster::builtin)
    }

    /// Configured source, then the local file, then the built-in roster.
    fn load_sources(&self) -> Roster {
        match &self.config.source {
            SourceConfig::Json => {}
            SourceConfig::Excel { path } if !path.as_os_str().is_empty() => {
                let path = paths::resolve(&self.root, path);
                match gateway::load_workbook(&path) {
                    Ok(roster) => return roster,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "workbook source failed, falling back")
                    }
                }
            }
            SourceConfig::Excel { .. } => {}
            SourceConfig::GoogleSheets { sheet } => {
                if let Some(service) = self.mirror.as_deref() {
                    match gateway::load_remote(service, sheet) {
                        Ok(roster) => return roster,
                        Err(e) => {
                            tracing::warn!(sheet = %sheet, error = %e, "remote sheet source failed, falling back")
                        }
                    }
                }
            }
        }

        match self.local.load() {
            Ok(Some(roster)) => return roster,
            Ok(None) => {
                tracing::debug!(path = %self.local.path().display(), "no local data file")
            }
            Err(e) => {
                tracing::warn!(path = %self.local.path().display(), error = %e, "local data file unreadable, falling back")
            }
        }

        tracing::info!("using built-in roster");
        Roster::builtin()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add_participant(&mut self, name: &str) -> Result<Outcome> {
        self.apply(|r| r.add_participant(name).map(drop))
    }

    pub fn remove_participant(&mut self, index: usize) -> Result<Outcome> {
        self.apply(|r| r.remove_participant(index).map(drop))
    }

    /// Add a cycle. The returned outcome's `advanced` only reports an
    /// auto-advance, never the manually added cycle.
    pub fn add_cycle(&mut self, name: Option<&str>) -> Result<(String, Outcome)> {
        let mut added = String::new();
        let outcome = self.apply(|r| {
            added = r.add_cycle(name)?;
            Ok(())
        })?;
        Ok((added, outcome))
    }

    pub fn set_flag(&mut self, index: usize, cycle: &str, value: bool) -> Result<Outcome> {
        self.apply(|r| r.set_flag(index, cycle, value))
    }

    /// Flip a flag. Returns its new value.
    pub fn toggle_flag(&mut self, index: usize, cycle: &str) -> Result<(bool, Outcome)> {
        let mut value = false;
        let outcome = self.apply(|r| {
            value = r.toggle_flag(index, cycle)?;
            Ok(())
        })?;
        Ok((value, outcome))
    }

    /// Explicit advance check; saves either way.
    pub fn check(&mut self) -> Result<Outcome> {
        self.apply(|_| Ok(()))
    }

    /// Replace the session roster wholesale with an imported snapshot.
    pub fn import(&mut self, mut roster: Roster) -> Result<Outcome> {
        roster.ensure_seeded();
        roster.materialize();
        self.roster = Some(roster);
        self.apply(|_| Ok(()))
    }

    /// Import a canonical JSON document or a spreadsheet workbook, chosen by
    /// file extension.
    pub fn import_file(&mut self, path: &Path) -> Result<Outcome> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let roster = if is_json {
            let data = std::fs::read_to_string(path)?;
            let doc: serde_json::Value = serde_json::from_str(&data)?;
            normalize::from_document(&doc)?
        } else {
            gateway::load_workbook(path)?
        };
        self.import(roster)
    }

    /// Import from a remote sheet through the session's mirror, or a client
    /// built from the sheets config when no mirror is configured.
    pub fn import_sheet(&mut self, identifier: &str) -> Result<Outcome> {
        let roster = match self.mirror.as_deref() {
            Some(service) => gateway::load_remote(service, identifier)?,
            None => {
                let client = SheetsClient::from_config(&self.config.sheets)?;
                gateway::load_remote(&client, identifier)?
            }
        };
        self.import(roster)
    }

    /// Run `op` against the roster; on success advance and save. A failed
    /// op or a failed local write leaves memory and disk untouched.
    fn apply<F>(&mut self, op: F) -> Result<Outcome>
    where
        F: FnOnce(&mut Roster) -> Result<()>,
    {
        let roster = self.loaded();
        let before = roster.clone();
        op(roster)?;
        let advanced = if roster.try_advance_cycle() {
            roster.current_cycle().map(str::to_string)
        } else {
            None
        };
        match self.save() {
            Ok(mirror) => Ok(Outcome { advanced, mirror }),
            Err(e) => {
                self.roster = Some(before);
                Err(e)
            }
        }
    }

    /// Local write first (fatal on failure), then the mirror (reported only).
    /// The mirror is never contacted when the local write fails.
    pub fn save(&mut self) -> Result<MirrorStatus> {
        let roster = self.loaded().clone();
        self.write_through(&roster)
    }

    fn write_through(&self, roster: &Roster) -> Result<MirrorStatus> {
        self.local.save(roster)?;

        let (Some(service), Some(sheet)) =
            (self.mirror.as_deref(), self.config.source.mirror_sheet())
        else {
            return Ok(MirrorStatus::Skipped);
        };
        match gateway::save_remote(service, sheet, roster) {
            Ok(()) => Ok(MirrorStatus::Synced),
            Err(e) => {
                tracing::warn!(sheet = %sheet, error = %e, "mirror save failed; local file is current");
                Ok(MirrorStatus::Failed(e.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
