mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    bot::BotSubcommand, config::ConfigSubcommand, cycle::CycleSubcommand,
    person::PersonSubcommand, report::ReportSubcommand,
};
use prayer_core::export::ExportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prayer",
    about = "Track rotating prayer cycles: who has prayed, who is pending, and when the next round starts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .prayer/)
    #[arg(long, global = true, env = "PRAYER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config and seed the data file
    Init,

    /// Show everyone's flags across all cycles
    List,

    /// Show progress of the current cycle
    Status,

    /// Print the chat-formatted reports
    Report {
        #[command(subcommand)]
        subcommand: ReportSubcommand,
    },

    /// Add or remove people
    Person {
        #[command(subcommand)]
        subcommand: PersonSubcommand,
    },

    /// Add cycles or check for completion
    Cycle {
        #[command(subcommand)]
        subcommand: CycleSubcommand,
    },

    /// Mark a person as prayed
    Mark {
        /// Person number as shown by `prayer list`
        number: usize,
        /// Cycle name (default: current cycle)
        #[arg(long)]
        cycle: Option<String>,
        /// Clear the flag instead of setting it
        #[arg(long)]
        undo: bool,
    },

    /// Flip a person's flag
    Toggle {
        /// Person number as shown by `prayer list`
        number: usize,
        /// Cycle name (default: current cycle)
        #[arg(long)]
        cycle: Option<String>,
    },

    /// Replace the roster from a JSON document, a workbook, or a remote sheet
    Import {
        /// .json, .xlsx, .xls or .ods file
        #[arg(required_unless_present = "sheet", conflicts_with = "sheet")]
        file: Option<PathBuf>,
        /// Remote sheet name, URL or key
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Export the roster
    Export {
        /// json or csv
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Output file or directory (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Control the chat bot listener
    Bot {
        #[command(subcommand)]
        subcommand: BotSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Bot {
            subcommand: BotSubcommand::Run,
        } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Report { subcommand } => cmd::report::run(&root, subcommand),
        Commands::Person { subcommand } => cmd::person::run(&root, subcommand, cli.json),
        Commands::Cycle { subcommand } => cmd::cycle::run(&root, subcommand, cli.json),
        Commands::Mark {
            number,
            cycle,
            undo,
        } => cmd::mark::mark(&root, number, cycle.as_deref(), !undo, cli.json),
        Commands::Toggle { number, cycle } => {
            cmd::mark::toggle(&root, number, cycle.as_deref(), cli.json)
        }
        Commands::Import { file, sheet } => {
            cmd::import::run(&root, file.as_deref(), sheet.as_deref(), cli.json)
        }
        Commands::Export { format, out } => cmd::export::run(&root, format, out.as_deref()),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Bot { subcommand } => cmd::bot::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
