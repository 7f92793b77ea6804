use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use prayer_bot::{BotError, Listener, ListenerConfig, TelegramClient};
use prayer_core::config::Config;
use prayer_core::paths;
use prayer_core::status::RunStatus;
use prayer_core::Session;
use std::path::Path;
use std::time::Duration;

#[derive(Subcommand)]
pub enum BotSubcommand {
    /// Run the listener in the foreground until Ctrl-C or `prayer bot stop`
    Run,
    /// Ask a running listener to stop on its next poll
    Stop,
    /// Show whether the listener is marked running
    Status,
}

pub fn run(root: &Path, subcmd: BotSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    match subcmd {
        BotSubcommand::Run => run_listener(root, config),
        BotSubcommand::Stop => stop(root, &config, json),
        BotSubcommand::Status => status(root, &config, json),
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

fn run_listener(root: &Path, config: Config) -> anyhow::Result<()> {
    let token = config
        .bot
        .token()
        .ok_or_else(|| BotError::MissingToken(config.bot.token_env.clone()))?;
    let client = TelegramClient::new(&config.bot.api_base, &token)?;
    let listener_config = ListenerConfig {
        poll_interval: Duration::from_millis(config.bot.poll_interval_ms.max(1)),
        mini_app_url: config.bot.mini_app_url.clone(),
        status_path: paths::status_path(root, &config),
    };
    let session = Session::open(root, config).context("failed to open session")?;
    let listener = Listener::new(client, session, listener_config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let handle = listener.spawn()?;
        println!("Bot listening. Ctrl-C or `prayer bot stop` to stop.");
        handle
            .run_until(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    })?;
    println!("Bot stopped.");
    Ok(())
}

// ---------------------------------------------------------------------------
// stop
// ---------------------------------------------------------------------------

fn stop(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    let path = paths::status_path(root, config);
    let was_running = RunStatus::load(&path).running;
    RunStatus::write(&path, false)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if json {
        return print_json(&serde_json::json!({
            "was_running": was_running,
            "running": false,
        }));
    }
    if was_running {
        println!("Stop requested. The listener exits on its next poll.");
    } else {
        println!("Bot is not running.");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

fn status(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    let status = RunStatus::load(&paths::status_path(root, config));

    if json {
        return print_json(&status);
    }
    let state = if status.running { "running" } else { "stopped" };
    match status.updated_at {
        Some(at) => println!(
            "Bot: {state} (since {})",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("Bot: {state}"),
    }
    Ok(())
}
