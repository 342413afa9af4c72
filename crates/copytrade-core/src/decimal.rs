//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors in position sizing.

use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction of the available balance committed to every new position.
pub const POSITION_FRACTION: Decimal = dec!(0.20);

/// Price with exact decimal precision.
///
/// Used for stop-profit and stop-loss levels. The textual form received from
/// the signal source is kept so the exchange sees exactly what was sent.
/// Zero is accepted and forwarded as-is; the exchange reads it as "unset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    value: Decimal,
    raw: String,
}

impl Price {
    #[inline]
    pub fn inner(&self) -> Decimal {
        self.value
    }

    /// The price as originally received.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Price {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|e| CoreError::InvalidPrice(format!("{trimmed:?}: {e}")))?;
        if value < Decimal::ZERO {
            return Err(CoreError::InvalidPrice(format!(
                "{trimmed:?}: must not be negative"
            )));
        }
        Ok(Self {
            value,
            raw: trimmed.to_string(),
        })
    }
}

impl TryFrom<String> for Price {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.raw
    }
}

/// Order size with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Derive the position size from an available balance reported by the
    /// exchange: `balance * POSITION_FRACTION`.
    ///
    /// Fails if the balance is not a decimal or is not positive.
    pub fn from_balance(available: &str) -> Result<Self> {
        let balance = Decimal::from_str(available.trim())
            .map_err(|e| CoreError::InvalidBalance(format!("{available:?}: {e}")))?;
        let size = Self(balance * POSITION_FRACTION);
        if !size.is_positive() {
            return Err(CoreError::InvalidBalance(format!(
                "{available:?}: no funds available"
            )));
        }
        Ok(size)
    }

    /// Wire representation: trailing zeros stripped, but always at least one
    /// fractional digit (`100` -> `"100.0"`, `24.6900` -> `"24.69"`).
    pub fn to_wire_string(&self) -> String {
        let normalized = self.0.normalize();
        if normalized.scale() == 0 {
            format!("{normalized}.0")
        } else {
            normalized.to_string()
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Decimal::from_str(s)?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}
