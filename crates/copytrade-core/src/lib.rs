//! Core domain types for the copy-trade webhook bridge.
//!
//! This crate provides the types shared by the exchange client, the trade
//! orchestrator and the webhook endpoint:
//! - `TradeInstruction`: a validated open/close instruction
//! - `Price`, `Size`: precision-safe numeric types and position sizing
//! - `OrderPayload` and the copy-trading wire payloads
//! - `Symbol`, `OrderSide`, `TrackingNo`: exchange identifiers

pub mod decimal;
pub mod error;
pub mod instruction;
pub mod order;
pub mod types;

pub use decimal::{Price, Size, POSITION_FRACTION};
pub use error::{CoreError, Result};
pub use instruction::{CloseTrade, OpenTrade, TradeInstruction};
pub use order::{CloseTrackPayload, ModifyTpslPayload, OrderPayload, MARGIN_COIN, MARKET_ORDER};
pub use types::{OrderSide, Symbol, TrackingNo};
