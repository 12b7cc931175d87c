//! Configuration models.
//!
//! `AppConfig` is the non-secret part (config.toml); `SecretConfig` holds
//! keys and is stored separately (secret.json).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::relative_date::Locale;

/// Default timeout applied to every remote auth call.
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 15;

/// Root of config.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Language for relative dates and store messages.
    #[serde(default)]
    pub locale: Locale,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub logging: LogSettings,
}

/// Hosted backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_auth_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_auth_timeout_secs() -> u64 {
    DEFAULT_AUTH_TIMEOUT_SECS
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_AUTH_TIMEOUT_SECS,
        }
    }
}

impl AuthSettings {
    /// Timeout for one remote auth call. Zero falls back to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `fitfeed_application=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily-rotated log file under the logs directory.
    #[serde(default)]
    pub file_logging: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: false,
        }
    }
}

/// Contents of secret.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub backend: BackendSecret,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BackendSecret {
    /// Public (anon) API key sent with every backend request.
    #[serde(default)]
    pub anon_key: String,
}

// Never print key material.
impl std::fmt::Debug for BackendSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSecret")
            .field("anon_key", &if self.anon_key.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}
