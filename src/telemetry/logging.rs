//! Tracing subscriber setup
//!
//! The library itself only emits `tracing` events. Applications (including the
//! `blobkit` binary) call [`init_logging`] once to route them to stderr and,
//! optionally, to a daily rolling log file.

use std::path::PathBuf;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::{BlobkitError, Result};

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "blobkit.log";

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `blobkit=debug`
    pub level: String,
    /// Whether to log to stderr
    pub console_enabled: bool,
    /// Whether file output is JSON formatted
    pub json_format: bool,
    /// Directory for rolling log files; no file output when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            console_enabled: true,
            json_format: true,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("BLOBKIT_LOG_LEVEL") {
            config.level = level;
        }

        if let Ok(enabled) = std::env::var("BLOBKIT_CONSOLE_LOGGING") {
            config.console_enabled = enabled.parse().unwrap_or(true);
        }

        if let Ok(json) = std::env::var("BLOBKIT_JSON_LOGS") {
            config.json_format = json.parse().unwrap_or(true);
        }

        if let Ok(log_dir) = std::env::var("BLOBKIT_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(log_dir));
        }

        config
    }

    /// Override the filter directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Guard that must be kept alive for the duration of the application
/// to ensure proper log flushing
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global tracing subscriber.
///
/// Fails with `ConfigurationError` if the log directory cannot be created or a
/// global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<LoggingGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut file_guard = None;

    if config.console_enabled {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_filter(env_filter(&config.level))
            .boxed();
        layers.push(console_layer);
    }

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            BlobkitError::configuration_error(format!("Failed to create log directory: {}", e))
        })?;

        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_timer(ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f UTC".to_string()))
            .with_file(true)
            .with_line_number(true)
            .with_target(true);

        let file_layer = if config.json_format {
            file_layer
                .json()
                .with_current_span(true)
                .with_filter(env_filter(&config.level))
                .boxed()
        } else {
            file_layer.with_filter(env_filter(&config.level)).boxed()
        };
        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| {
            BlobkitError::configuration_error(format!("Failed to install logging subscriber: {}", e))
        })?;

    info!(
        level = %config.level,
        console = config.console_enabled,
        log_dir = ?config.log_dir,
        json_format = config.json_format,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert!(config.console_enabled);
        assert!(config.json_format);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_with_level() {
        let config = LoggingConfig::default().with_level("blobkit=debug");
        assert_eq!(config.level, "blobkit=debug");
    }

    #[test]
    fn test_second_initialization_fails() {
        let config = LoggingConfig {
            console_enabled: false,
            ..Default::default()
        };

        let _guard = init_logging(config.clone());
        let second = init_logging(config);
        assert!(matches!(
            second,
            Err(BlobkitError::ConfigurationError { .. })
        ));
    }
}
