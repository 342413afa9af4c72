//! Executor error types.

use copytrade_core::Symbol;
use copytrade_exchange::ExchangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradeError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Invalid balance: {0}")]
    InvalidBalance(String),

    #[error("Tracking number not found for {symbol}")]
    TrackingNumberNotFound { symbol: Symbol },
}

pub type TradeResult<T> = Result<T, TradeError>;
