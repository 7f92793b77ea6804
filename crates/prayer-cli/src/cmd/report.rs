use clap::Subcommand;
use prayer_core::report;
use std::path::Path;

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Every person with per-cycle status, as the bot sends it
    List,
    /// Current cycle counts and pending names, as the bot sends it
    Status,
}

pub fn run(root: &Path, subcmd: ReportSubcommand) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let roster = session.roster();
    let text = match subcmd {
        ReportSubcommand::List => report::list_report(roster),
        ReportSubcommand::Status => report::status_report(roster),
    };
    println!("{}", text.trim_end());
    Ok(())
}
