//! Request payloads sent to the exchange.
//!
//! Field names and declaration order match the exchange's JSON bodies; the
//! serialized body is also the string that gets signed.

use crate::decimal::{Price, Size};
use crate::instruction::OpenTrade;
use crate::types::{OrderSide, Symbol, TrackingNo};
use serde::{Deserialize, Serialize};

/// Settlement currency for every position.
pub const MARGIN_COIN: &str = "USDT";

/// Order type for every opened position.
pub const MARKET_ORDER: &str = "market";

/// Body of a place-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub symbol: String,
    pub margin_coin: String,
    pub size: String,
    pub side: String,
    pub order_type: String,
}

impl OrderPayload {
    /// Market order in USDT margin.
    pub fn market(symbol: &Symbol, side: &OrderSide, size: Size) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            margin_coin: MARGIN_COIN.to_string(),
            size: size.to_wire_string(),
            side: side.as_str().to_string(),
            order_type: MARKET_ORDER.to_string(),
        }
    }

    /// Market order for an open instruction.
    pub fn for_open(open: &OpenTrade, size: Size) -> Self {
        Self::market(&open.symbol, &open.side, size)
    }
}

/// Body of a modify stop-profit/stop-loss request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyTpslPayload {
    pub symbol: String,
    pub tracking_no: String,
    pub stop_profit_price: String,
    pub stop_loss_price: String,
}

impl ModifyTpslPayload {
    pub fn new(
        tracking_no: &TrackingNo,
        symbol: &Symbol,
        stop_profit_price: &Price,
        stop_loss_price: &Price,
    ) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            tracking_no: tracking_no.as_str().to_string(),
            stop_profit_price: stop_profit_price.as_str().to_string(),
            stop_loss_price: stop_loss_price.as_str().to_string(),
        }
    }
}

/// Body of a close-tracked-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTrackPayload {
    pub symbol: String,
    pub tracking_no: String,
}

impl CloseTrackPayload {
    pub fn new(symbol: &Symbol, tracking_no: &TrackingNo) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            tracking_no: tracking_no.as_str().to_string(),
        }
    }
}
