use crate::output::{print_json, print_outcome};
use clap::Subcommand;
use prayer_core::report;
use std::path::Path;

#[derive(Subcommand)]
pub enum CycleSubcommand {
    /// Append a cycle with everyone unset
    Add {
        /// Cycle name (default: next `Cycle <N>`)
        #[arg(long)]
        name: Option<String>,
    },
    /// Start the next cycle if everyone has prayed in the current one
    Check,
}

pub fn run(root: &Path, subcmd: CycleSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CycleSubcommand::Add { name } => add(root, name.as_deref(), json),
        CycleSubcommand::Check => check(root, json),
    }
}

fn add(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let (added, outcome) = session.add_cycle(name)?;

    if json {
        return print_json(&serde_json::json!({
            "added": added,
            "outcome": outcome,
        }));
    }
    println!("Added cycle '{added}'");
    print_outcome(&outcome);
    Ok(())
}

fn check(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let outcome = session.check()?;
    let progress = report::progress(session.roster());

    if json {
        return print_json(&serde_json::json!({
            "outcome": outcome,
            "progress": progress,
        }));
    }
    if outcome.advanced.is_none() {
        if let Some(p) = progress {
            println!(
                "{} still in progress: {}/{} prayed",
                p.cycle, p.prayed, p.total
            );
        }
    }
    print_outcome(&outcome);
    Ok(())
}
