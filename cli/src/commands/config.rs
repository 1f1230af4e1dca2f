//! Config command - show and change settings.

use anyhow::Result;
use portfix_core::{Config, ConfigStore};
use tracing::debug;

pub async fn show(json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let config = store.load().await?;
    debug!(path = %store.path().display(), "loaded config");

    print_config(&config, json)
}

pub async fn set(key: &str, value: &str, json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let config = store.set(key, value).await?;

    if !json {
        println!("Updated {}.\n", key);
    }
    print_config(&config, json)
}

pub fn path() -> Result<()> {
    let store = ConfigStore::new()?;
    println!("{}", store.path().display());
    Ok(())
}

fn print_config(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("Configuration:");
    println!("  createBackup:     {}", config.create_backup);
    println!("  backupSuffix:     {}", config.backup_suffix);
    println!("  timestampBackups: {}", config.timestamp_backups);
    Ok(())
}
