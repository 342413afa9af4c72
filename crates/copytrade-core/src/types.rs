//! Exchange identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange-specific instrument id (e.g., "BTCUSDT_UMCBL").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Order direction as understood by the exchange (e.g., "open_long",
/// "open_short"). Passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderSide(String);

impl OrderSide {
    pub fn new(side: impl Into<String>) -> Self {
        Self(side.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderSide {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier the exchange assigns to a tracked (copy-trading) position.
///
/// Opaque: only ever received from the exchange and sent back to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNo(String);

impl TrackingNo {
    pub fn new(tracking_no: impl Into<String>) -> Self {
        Self(tracking_no.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
