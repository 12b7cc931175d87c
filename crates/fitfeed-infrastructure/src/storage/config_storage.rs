//! config.toml storage.
//!
//! Responsibilities:
//! - Parse config.toml into [`AppConfig`], filling defaults for absent keys
//! - Write a default file on first start so users have something to edit
//! - Atomic save (tmp file + rename)

use std::path::PathBuf;

use fitfeed_core::config::AppConfig;
use fitfeed_core::error::{FitfeedError, Result};

use super::atomic_file::{read_optional, write_atomic};

pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage handle for the config file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the config file.
    ///
    /// - missing or blank file → `Ok(None)`
    /// - unparseable file → `Err(Serialization)`
    pub async fn load(&self) -> Result<Option<AppConfig>> {
        let Some(content) = read_optional(&self.path).await? else {
            return Ok(None);
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&content)?))
    }

    /// Loads the config, writing and returning the defaults when absent.
    pub async fn load_or_init(&self) -> Result<AppConfig> {
        if let Some(config) = self.load().await? {
            return Ok(config);
        }
        let config = AppConfig::default();
        self.save(&config).await?;
        tracing::info!("[ConfigStorage] Wrote default config to {:?}", self.path);
        Ok(config)
    }

    /// Saves `config` atomically.
    pub async fn save(&self, config: &AppConfig) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)?;
        write_atomic(&self.path, &toml_string)
            .await
            .map_err(|e| FitfeedError::io(format!("failed to write {:?}: {}", self.path, e)))
    }
}
