//! Configuration management for how fixed files are written.
//!
//! Stores configuration in JSON format at `~/.portfix/config.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Copy the original file aside before fixing it in place.
    #[serde(default = "default_true", rename = "createBackup")]
    pub create_backup: bool,

    /// Extension appended to backup file names.
    #[serde(default = "default_backup_suffix", rename = "backupSuffix")]
    pub backup_suffix: String,

    /// Put a timestamp into backup file names so older backups survive.
    #[serde(default, rename = "timestampBackups")]
    pub timestamp_backups: bool,
}

fn default_true() -> bool {
    true
}

fn default_backup_suffix() -> String {
    "bak".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_backup: true,
            backup_suffix: default_backup_suffix(),
            timestamp_backups: false,
        }
    }
}

impl Config {
    /// Configuration keys accepted by [`Config::set`].
    pub const KEYS: [&'static str; 3] = ["createBackup", "backupSuffix", "timestampBackups"];

    /// Update one setting from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "createBackup" => self.create_backup = parse_bool(key, value)?,
            "timestampBackups" => self.timestamp_backups = parse_bool(key, value)?,
            "backupSuffix" => {
                let suffix = value.trim().trim_start_matches('.');
                if suffix.is_empty() || suffix.contains(['/', '\\']) {
                    return Err(Error::Config(format!(
                        "Invalid backup suffix: {:?}",
                        value
                    )));
                }
                self.backup_suffix = suffix.to_string();
            }
            _ => {
                return Err(Error::Config(format!(
                    "Unknown setting {:?} (expected one of: {})",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::Config(format!(
            "Invalid value {:?} for {}: expected true or false",
            value, key
        ))),
    }
}

/// Configuration store for managing settings.
///
/// Handles reading and writing configuration to `~/.portfix/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.portfix/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".portfix").join("config.json");

        Ok(Self { config_path })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<Config> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &Config) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            fs::create_dir_all(config_dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        Ok(())
    }

    /// Update one setting and persist it.
    pub async fn set(&self, key: &str, value: &str) -> Result<Config> {
        let mut config = self.load().await?;
        config.set(key, value)?;
        self.save(&config).await?;
        Ok(config)
    }
}
