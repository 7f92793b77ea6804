use crate::output::{print_json, print_outcome};
use std::path::Path;

pub fn mark(
    root: &Path,
    number: usize,
    cycle: Option<&str>,
    value: bool,
    json: bool,
) -> anyhow::Result<()> {
    let index = super::person_index(number)?;
    let mut session = super::open_session(root)?;
    let cycle = super::target_cycle(&mut session, cycle)?;
    let outcome = session.set_flag(index, &cycle, value)?;
    report(&mut session, index, &cycle, value, &outcome, json)
}

pub fn toggle(root: &Path, number: usize, cycle: Option<&str>, json: bool) -> anyhow::Result<()> {
    let index = super::person_index(number)?;
    let mut session = super::open_session(root)?;
    let cycle = super::target_cycle(&mut session, cycle)?;
    let (value, outcome) = session.toggle_flag(index, &cycle)?;
    report(&mut session, index, &cycle, value, &outcome, json)
}

fn report(
    session: &mut prayer_core::Session,
    index: usize,
    cycle: &str,
    value: bool,
    outcome: &prayer_core::Outcome,
    json: bool,
) -> anyhow::Result<()> {
    let name = session
        .roster()
        .people
        .get(index)
        .map(|p| p.name.clone())
        .unwrap_or_default();

    if json {
        return print_json(&serde_json::json!({
            "name": name,
            "cycle": cycle,
            "prayed": value,
            "outcome": outcome,
        }));
    }
    let status = if value { "prayed" } else { "not yet" };
    println!("{name}: {status} in {cycle}");
    print_outcome(outcome);
    Ok(())
}
