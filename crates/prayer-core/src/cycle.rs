//! Cycle progression state machine over a [`Roster`].
//!
//! The engine keeps no state of its own. Every operation validates before it
//! mutates, so a rejected call leaves the roster untouched.

use crate::error::{Result, ValidationError};
use crate::model::{Participant, Roster};

pub const CYCLE_PREFIX: &str = "Cycle ";

/// Numeric suffix of an auto-generated `Cycle <N>` name. Suffixes that do
/// not fit a `u64` are treated as custom names.
pub fn cycle_number(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(CYCLE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `max(N) + 1` over `Cycle <N>` columns, or 1 when there are none.
/// `None` once the maximum is `u64::MAX`.
pub fn next_cycle_number(columns: &[String]) -> Option<u64> {
    match columns.iter().filter_map(|c| cycle_number(c)).max() {
        Some(n) => n.checked_add(1),
        None => Some(1),
    }
}

pub fn next_cycle_name(columns: &[String]) -> Option<String> {
    next_cycle_number(columns).map(|n| format!("{CYCLE_PREFIX}{n}"))
}

impl Roster {
    /// True iff the roster is non-empty and everyone's flag for `cycle` is
    /// set. An empty roster never completes.
    pub fn is_cycle_complete(&self, cycle: &str) -> bool {
        !self.people.is_empty() && self.people.iter().all(|p| p.flag(cycle))
    }

    /// Append the next auto-named cycle if the current one is complete.
    /// Returns whether a cycle was added.
    pub fn try_advance_cycle(&mut self) -> bool {
        let Some(last) = self.current_cycle() else {
            return false;
        };
        if !self.is_cycle_complete(last) {
            return false;
        }
        let Some(name) = next_cycle_name(&self.columns) else {
            tracing::warn!(cycle = %last, "cycle complete but no cycle number is left");
            return false;
        };
        self.push_cycle(name.clone());
        tracing::info!(cycle = %name, "cycle complete, advanced");
        true
    }

    /// Append a cycle (auto-named when `name` is `None` or blank) with every
    /// participant's flag reset. Returns the name that was added.
    pub fn add_cycle(&mut self, name: Option<&str>) -> Result<String> {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => next_cycle_name(&self.columns)
                .ok_or(ValidationError::CycleNumbersExhausted)?,
        };
        self.push_cycle(name.clone());
        Ok(name)
    }

    /// Append a participant with every existing cycle defaulted false.
    /// Returns the new participant's index.
    pub fn add_participant(&mut self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let mut person = Participant::new(name);
        for column in &self.columns {
            person.set_flag(column, false);
        }
        self.people.push(person);
        Ok(self.people.len() - 1)
    }

    /// Remove the participant at `index`, keeping the order of the rest.
    pub fn remove_participant(&mut self, index: usize) -> Result<Participant> {
        self.check_index(index)?;
        Ok(self.people.remove(index))
    }

    pub fn set_flag(&mut self, index: usize, cycle: &str, value: bool) -> Result<()> {
        self.check_index(index)?;
        if !self.has_cycle(cycle) {
            return Err(ValidationError::UnknownCycle(cycle.to_string()).into());
        }
        self.people[index].set_flag(cycle, value);
        Ok(())
    }

    /// Flip a flag. Returns the new value.
    pub fn toggle_flag(&mut self, index: usize, cycle: &str) -> Result<bool> {
        self.check_index(index)?;
        let value = !self.people[index].flag(cycle);
        self.set_flag(index, cycle, value)?;
        Ok(value)
    }

    fn push_cycle(&mut self, name: String) {
        for person in &mut self.people {
            person.set_flag(&name, false);
        }
        self.columns.push(name);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.people.len() {
            return Err(ValidationError::ParticipantOutOfRange {
                index,
                len: self.people.len(),
            }
            .into());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
