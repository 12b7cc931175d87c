//! Unified path management for fitfeed files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fitfeed/           # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # Backend keys
//!
//! ~/.local/share/fitfeed/      # Data directory
//! ├── store/                   # Key-value slots (auth-store.json, mode-store.json)
//! └── logs/                    # Application logs
//!     └── fitfeed.log.YYYY-MM-DD
//! ```
//!
//! Passing a base directory to [`FitfeedPaths::new`] roots both trees under
//! it (`<base>/config`, `<base>/data`), which tests use to stay inside a
//! temporary directory.

use std::path::PathBuf;

const APP_DIR: &str = "fitfeed";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for fitfeed_core::FitfeedError {
    fn from(err: PathError) -> Self {
        fitfeed_core::FitfeedError::config(err.to_string())
    }
}

/// Path resolver for every file fitfeed reads or writes.
#[derive(Debug, Clone, Default)]
pub struct FitfeedPaths {
    base: Option<PathBuf>,
}

impl FitfeedPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to secret.json.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the directory holding key-value slots.
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }

    /// Returns the log directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}
