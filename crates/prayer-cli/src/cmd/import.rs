use crate::output::{print_json, print_outcome};
use anyhow::Context;
use std::path::Path;

pub fn run(
    root: &Path,
    file: Option<&Path>,
    sheet: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let (source, outcome) = match (file, sheet) {
        (Some(path), _) => {
            let outcome = session
                .import_file(path)
                .with_context(|| format!("failed to import {}", path.display()))?;
            (path.display().to_string(), outcome)
        }
        (None, Some(sheet)) => {
            let outcome = session
                .import_sheet(sheet)
                .with_context(|| format!("failed to import sheet '{sheet}'"))?;
            (sheet.to_string(), outcome)
        }
        (None, None) => anyhow::bail!("give a file or --sheet"),
    };
    let roster = session.roster();

    if json {
        return print_json(&serde_json::json!({
            "source": source,
            "people": roster.people.len(),
            "columns": roster.columns,
            "outcome": outcome,
        }));
    }
    println!(
        "Imported {} people and {} cycles from {source}",
        roster.people.len(),
        roster.columns.len()
    );
    print_outcome(&outcome);
    Ok(())
}
