//! Application configuration.

use crate::error::{AppError, AppResult};
use copytrade_exchange::ExchangeConfig;
use copytrade_executor::ExecutorConfig;
use copytrade_telemetry::LoggingConfig;
use copytrade_webhook::WebhookConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "COPYTRADE_CONFIG";
/// Config file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

pub const API_KEY_ENV: &str = "BITGET_API_KEY";
pub const SECRET_KEY_ENV: &str = "BITGET_SECRET_KEY";
pub const PASSPHRASE_ENV: &str = "BITGET_PASSPHRASE";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exchange endpoint and credentials.
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Trade orchestration.
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// Inbound webhook server.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Logging.
    #[serde(default)]
    pub telemetry: LoggingConfig,
    /// Fetch the balance once before serving and abort if that fails.
    /// Default: true.
    #[serde(default = "default_startup_balance_check")]
    pub startup_balance_check: bool,
}

fn default_startup_balance_check() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exchange: ExchangeConfig::default(),
            executor: ExecutorConfig::default(),
            webhook: WebhookConfig::default(),
            telemetry: LoggingConfig::default(),
            startup_balance_check: default_startup_balance_check(),
        }
    }
}

impl AppConfig {
    /// Config path: explicit argument > `COPYTRADE_CONFIG` > default file.
    pub fn resolve_path(explicit: Option<String>) -> String {
        explicit
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load configuration from environment.
    ///
    /// Reads the file at `path`, falling back to defaults only when `path`
    /// is the default file and it does not exist. Credential environment
    /// variables override file values.
    pub fn load(path: &str) -> AppResult<Self> {
        let mut config = if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Self::default()
        } else {
            Self::from_file(path)?
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Override credentials with non-empty values from `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let credentials = &mut self.exchange.credentials;
        let targets = [
            (API_KEY_ENV, &mut credentials.api_key),
            (SECRET_KEY_ENV, &mut credentials.secret_key),
            (PASSPHRASE_ENV, &mut credentials.passphrase),
        ];
        for (key, field) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        let missing = self.exchange.credentials.missing();
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "missing exchange credentials: {} (set in [exchange.credentials] or via {API_KEY_ENV}, {SECRET_KEY_ENV}, {PASSPHRASE_ENV})",
                missing.join(", ")
            )));
        }
        if self.exchange.base_url.trim().is_empty() {
            return Err(AppError::Config("exchange.base_url is empty".to_string()));
        }
        if self.exchange.product_type.trim().is_empty() {
            return Err(AppError::Config("exchange.product_type is empty".to_string()));
        }
        self.webhook.validate().map_err(AppError::Config)
    }
}
