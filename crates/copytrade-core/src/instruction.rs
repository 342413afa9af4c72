//! Trade instructions received from the signal source.
//!
//! An instruction either opens a market position with stop levels attached,
//! or closes the tracked position currently open for a symbol. Field
//! requirements differ per kind, so the two kinds are separate types.

use crate::decimal::Price;
use crate::error::{CoreError, Result};
use crate::types::{OrderSide, Symbol};
use serde::{Deserialize, Serialize};

/// Open a market position and attach stop-profit/stop-loss to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTrade {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub stop_profit_price: Price,
    pub stop_loss_price: Price,
}

/// Close the tracked position currently open for `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseTrade {
    pub symbol: Symbol,
}

/// A validated trade instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TradeInstruction {
    Open(OpenTrade),
    Close(CloseTrade),
}

impl TradeInstruction {
    /// Build an instruction from loosely-typed boundary fields.
    ///
    /// `is_close` must be `"0"` or `"1"`. Empty strings count as absent.
    /// For a close instruction only `symbol` is required; for an open
    /// instruction `side`, `stop_profit_price` and `stop_loss_price` are too.
    pub fn from_fields(
        symbol: Option<&str>,
        is_close: Option<&str>,
        side: Option<&str>,
        stop_profit_price: Option<&str>,
        stop_loss_price: Option<&str>,
    ) -> Result<Self> {
        let symbol = present(symbol).ok_or(CoreError::MissingField("symbol"))?;
        let is_close = present(is_close).ok_or(CoreError::MissingField("is_close"))?;

        match is_close {
            "1" => Ok(Self::Close(CloseTrade {
                symbol: Symbol::new(symbol),
            })),
            "0" => {
                let side = present(side).ok_or(CoreError::MissingField("side"))?;
                let stop_profit_price = present(stop_profit_price)
                    .ok_or(CoreError::MissingField("stopProfitPrice"))?;
                let stop_loss_price =
                    present(stop_loss_price).ok_or(CoreError::MissingField("stopLossPrice"))?;

                Ok(Self::Open(OpenTrade {
                    symbol: Symbol::new(symbol),
                    side: OrderSide::new(side),
                    stop_profit_price: stop_profit_price.parse()?,
                    stop_loss_price: stop_loss_price.parse()?,
                }))
            }
            other => Err(CoreError::InvalidCloseFlag(other.to_string())),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Open(open) => &open.symbol,
            Self::Close(close) => &close.symbol,
        }
    }

    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close(_))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
