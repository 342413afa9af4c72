//! Exchange client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// API credentials.
///
/// Security notes:
/// - Secret key and passphrase are wiped from memory on drop.
/// - `Debug` output redacts everything but the API key prefix.
/// - Never log these values.
#[derive(Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub passphrase: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Names of the credential fields that are empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push("api_key");
        }
        if self.secret_key.trim().is_empty() {
            missing.push("secret_key");
        }
        if self.passphrase.trim().is_empty() {
            missing.push("passphrase");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_prefix: String = self.api_key.chars().take(6).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format_args!("{key_prefix}***"))
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Query parameters for the tracking-number lookup issued right after an
/// order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingQueryConfig {
    /// Symbol to query. If None, the symbol of the order just placed is used.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Page size. Default: 20.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Page number. Default: 1.
    #[serde(default = "default_page_no")]
    pub page_no: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_page_no() -> u32 {
    1
}

impl Default for TrackingQueryConfig {
    fn default() -> Self {
        Self {
            symbol: None,
            page_size: default_page_size(),
            page_no: default_page_no(),
        }
    }
}

/// Exchange client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Product type tag sent with account and tracking queries.
    #[serde(default = "default_product_type")]
    pub product_type: String,
    /// Value of the `locale` header.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Per-request timeout in seconds. 0 (default) leaves only the HTTP
    /// library's own limits in place.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// API credentials.
    #[serde(default)]
    pub credentials: Credentials,
    /// Lookup parameters used after placing an order.
    #[serde(default)]
    pub tracking_query: TrackingQueryConfig,
}

fn default_base_url() -> String {
    "https://api.bitget.com".to_string()
}

fn default_product_type() -> String {
    "umcbl".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_request_timeout_secs() -> u64 {
    0
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            product_type: default_product_type(),
            locale: default_locale(),
            request_timeout_secs: default_request_timeout_secs(),
            credentials: Credentials::default(),
            tracking_query: TrackingQueryConfig::default(),
        }
    }
}

impl ExchangeConfig {
    /// Request timeout, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
