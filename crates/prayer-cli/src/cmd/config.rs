use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use prayer_core::config::Config;
use prayer_core::paths;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;

    if json {
        return print_json(&serde_json::json!({
            "config": config,
            "data_path": paths::data_path(root, &config),
            "status_path": paths::status_path(root, &config),
            "sheets_token_set": config.sheets.token().is_some(),
            "bot_token_set": config.bot.token().is_some(),
        }));
    }

    print!("{}", serde_yaml::to_string(&config)?);
    println!();
    println!("data file:   {}", paths::data_path(root, &config).display());
    println!("status file: {}", paths::status_path(root, &config).display());
    println!("source:      {}", config.source.as_str());
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            println!("[warning] {}", w.message);
        }
    }
    Ok(())
}
