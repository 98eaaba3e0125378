//! Configuration for choreledger

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::manager::LedgerOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the persisted ledger state
    #[serde(rename = "state-path")]
    pub state_path: PathBuf,

    /// Optional YAML catalog; the built-in catalog is used when unset
    #[serde(rename = "catalog-path")]
    pub catalog_path: Option<PathBuf>,

    /// Calendar days an instance is kept before it is purged
    #[serde(rename = "retention-days")]
    pub retention_days: i64,
}

fn default_state_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("choreledger")
        .join("state.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            catalog_path: None,
            retention_days: crate::DEFAULT_RETENTION_DAYS,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: ./choreledger.yml
        let local_config = PathBuf::from("choreledger.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/choreledger/choreledger.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("choreledger").join("choreledger.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the ledger cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.retention_days < 0 {
            return Err(eyre::eyre!(
                "retention-days must be zero or positive, got {}",
                self.retention_days
            ));
        }
        Ok(())
    }

    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            retention_days: self.retention_days,
        }
    }
}
