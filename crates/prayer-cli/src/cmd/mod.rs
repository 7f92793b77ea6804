pub mod bot;
pub mod config;
pub mod cycle;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod mark;
pub mod person;
pub mod report;
pub mod status;

use anyhow::Context;
use prayer_core::config::Config;
use prayer_core::Session;
use std::path::Path;

/// Session over the configured sources. An uninitialized root runs on the
/// defaults.
pub fn open_session(root: &Path) -> anyhow::Result<Session> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    Session::open(root, config).context("failed to open session")
}

/// Convert a 1-based person number from the command line.
pub fn person_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .context("person numbers start at 1 (see `prayer list`)")
}

/// `--cycle` or the current cycle.
pub fn target_cycle(session: &mut Session, cycle: Option<&str>) -> anyhow::Result<String> {
    match cycle {
        Some(c) => Ok(c.to_string()),
        None => session
            .roster()
            .current_cycle()
            .map(str::to_string)
            .context("roster has no cycles"),
    }
}
