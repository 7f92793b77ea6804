//! Storage backends. Each one adapts its native shape to the canonical
//! [`Roster`] through [`crate::normalize`].

pub mod local;
pub mod sheets;
pub mod workbook;

pub use local::LocalStore;
pub use sheets::{resolve_sheet, SheetRef, SheetService, SheetsClient};

use crate::error::Result;
use crate::model::Roster;
use crate::normalize;
use std::path::Path;

/// One-shot import of the first worksheet of a spreadsheet file.
pub fn load_workbook(path: &Path) -> Result<Roster> {
    let table = workbook::read_table(path)?;
    Ok(normalize::from_workbook(&table)?)
}

pub fn load_remote(service: &dyn SheetService, identifier: &str) -> Result<Roster> {
    let sheet = resolve_sheet(identifier)?;
    let values = service.fetch_values(&sheet)?;
    Ok(normalize::from_sheet_values(&values)?)
}

/// Overwrite the remote sheet with the full model, header row first.
pub fn save_remote(service: &dyn SheetService, identifier: &str, roster: &Roster) -> Result<()> {
    let sheet = resolve_sheet(identifier)?;
    service.replace_values(&sheet, &roster.to_rows())?;
    Ok(())
}
