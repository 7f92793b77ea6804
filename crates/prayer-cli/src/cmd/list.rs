use crate::output::{print_json, print_table};
use prayer_core::model::{bool_cell, NAME_COLUMN};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let outcome = session.refresh()?;
    let roster = session.roster();

    if json {
        return print_json(roster);
    }

    if roster.people.is_empty() {
        println!("No people yet. Add one with: prayer person add <name>");
        return Ok(());
    }

    let mut headers = vec!["#", NAME_COLUMN];
    headers.extend(roster.columns.iter().map(String::as_str));
    let rows = roster
        .people
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut row = vec![(i + 1).to_string(), p.name.clone()];
            row.extend(roster.columns.iter().map(|c| bool_cell(p.flag(c)).to_string()));
            row
        })
        .collect();
    print_table(&headers, rows);
    crate::output::print_outcome(&outcome);
    Ok(())
}
