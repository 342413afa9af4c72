//! Executor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trade orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Wait between placing an order and looking up its tracking number (ms).
    /// Default: 5000.
    #[serde(default = "default_tracking_delay_ms")]
    pub tracking_delay_ms: u64,
    /// Run at most one trade sequence per symbol at a time. Default: false.
    #[serde(default)]
    pub serialize_per_symbol: bool,
}

fn default_tracking_delay_ms() -> u64 {
    5_000
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tracking_delay_ms: default_tracking_delay_ms(),
            serialize_per_symbol: false,
        }
    }
}

impl ExecutorConfig {
    pub fn tracking_delay(&self) -> Duration {
        Duration::from_millis(self.tracking_delay_ms)
    }
}
