use crate::output::print_json;
use prayer_core::report;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let outcome = session.refresh()?;
    let stats = report::stats(session.roster());

    if json {
        return print_json(&stats);
    }

    println!("People: {}  Cycles: {}", stats.people, stats.cycles);
    match &stats.progress {
        Some(p) if p.total > 0 => {
            println!("Current cycle: {}", p.cycle);
            println!("Prayed:  {}/{}", p.prayed, p.total);
            println!("Pending: {}/{}", p.pending_count(), p.total);
            for name in &p.pending {
                println!("  - {name}");
            }
        }
        _ => println!("No data available yet."),
    }
    crate::output::print_outcome(&outcome);
    Ok(())
}
