//! Error types for copytrade-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid balance: {0}")]
    InvalidBalance(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid close flag: {0}")]
    InvalidCloseFlag(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
