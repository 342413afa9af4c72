//! Structured logging initialization.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{TelemetryError, TelemetryResult};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Also append log lines to this file. Never rotated. An empty path
    /// turns the file layer off.
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
}

fn default_level() -> String {
    "info,tower_http=debug".to_string()
}

fn default_log_file() -> Option<String> {
    Some(DEFAULT_LOG_FILE.to_string())
}

/// Audit log written next to the process unless configured otherwise.
pub const DEFAULT_LOG_FILE: &str = "copytrade.log";

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` if set and valid, else the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// File the log is appended to, if any.
    pub fn log_file_path(&self) -> Option<&str> {
        self.log_file.as_deref().filter(|path| !path.trim().is_empty())
    }
}

fn is_production() -> bool {
    std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false)
}

fn open_log_file(path: &str) -> TelemetryResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFile {
            path: path.to_string(),
            source,
        })
}

/// Initialize structured logging.
///
/// JSON output when `RUST_ENV=production`, pretty output otherwise. With
/// `log_file` set, every event is additionally appended to that file as
/// plain text without ANSI colors.
pub fn init_logging(config: &LoggingConfig) -> TelemetryResult<()> {
    let file_layer = match config.log_file_path() {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let console_layer = if is_production() {
        // JSON format for production
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed()
    } else {
        // Pretty format for development
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_names(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
