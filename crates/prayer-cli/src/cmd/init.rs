use anyhow::Context;
use prayer_core::{config::Config, gateway::LocalStore, io, paths, Roster};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing prayer list in: {}", root.display());

    let dir = paths::prayer_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if !config_path.exists() {
        let cfg = Config::default();
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        cfg
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    };

    let store = LocalStore::new(paths::data_path(root, &config));
    let shown = config.data_file.display();
    if !store.exists() {
        store
            .save(&Roster::builtin())
            .with_context(|| format!("failed to write {shown}"))?;
        println!("  created: {shown}");
    } else {
        println!("  exists:  {shown}");
    }

    println!("\nNext: prayer person add <name>");
    Ok(())
}
