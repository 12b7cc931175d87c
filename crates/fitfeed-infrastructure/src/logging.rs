//! Tracing subscriber setup.
//!
//! Installs a registry with an `EnvFilter`, a stderr formatter, and when
//! enabled a daily-rotated file under the logs directory. `RUST_LOG`
//! overrides the configured level.

use std::path::Path;

use anyhow::{Result, anyhow};
use fitfeed_core::config::LogSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "fitfeed.log";

/// Keeps the non-blocking file writer alive; logs are flushed on drop.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Builds the filter from `RUST_LOG`, falling back to `settings.level`.
pub fn build_filter(settings: &LogSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", settings.level, e)),
    }
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already set or the level is invalid.
pub fn init_logging(settings: &LogSettings, log_dir: &Path) -> Result<LogGuard> {
    let filter = build_filter(settings)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let (file_layer, file_guard) = if settings.file_logging {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
        let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!(
        "[Logging] Initialized (level: {}, file: {})",
        settings.level,
        settings.file_logging
    );

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        // RUST_LOG takes precedence over the configured level.
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let settings = LogSettings {
            level: "fitfeed=bogus".to_string(),
            file_logging: false,
        };
        assert!(build_filter(&settings).is_err());
    }

    #[test]
    fn test_default_level_parses() {
        assert!(build_filter(&LogSettings::default()).is_ok());
    }
}
