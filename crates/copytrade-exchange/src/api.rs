//! Exchange operations trait.
//!
//! Abstracts the signed REST calls behind a dyn-compatible trait so the
//! trade orchestrator can be driven by the real client or by a recording
//! mock in tests.

use std::pin::Pin;
use std::sync::Arc;

use copytrade_core::{OrderPayload, Price, Symbol, TrackingNo};

use crate::error::ExchangeResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Outcome of a lookup that may legitimately find nothing yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

/// Signed exchange operations used by the trade orchestrator.
///
/// Each method performs exactly one HTTP call. Mutating operations fail with
/// an error on any irregular response; lookups report `Lookup::NotFound`
/// instead and only fail when no response was received at all.
pub trait ExchangeApi: Send + Sync {
    /// Available balance of the futures account, as reported.
    fn get_balance(&self) -> BoxFuture<'_, ExchangeResult<String>>;

    /// Place a market order. Returns the raw response payload.
    fn place_order<'a>(
        &'a self,
        payload: &'a OrderPayload,
    ) -> BoxFuture<'a, ExchangeResult<serde_json::Value>>;

    /// Tracking number of the order just placed, using the configured
    /// after-order query (falls back to `symbol`).
    fn get_tracking_no_after_order<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> BoxFuture<'a, ExchangeResult<Lookup<TrackingNo>>>;

    /// Tracking number of the first open tracked order for `symbol`.
    fn get_current_order_tracking_no<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> BoxFuture<'a, ExchangeResult<Lookup<TrackingNo>>>;

    /// Attach stop-profit/stop-loss levels to a tracked order.
    fn modify_tpsl<'a>(
        &'a self,
        tracking_no: &'a TrackingNo,
        symbol: &'a Symbol,
        stop_profit_price: &'a Price,
        stop_loss_price: &'a Price,
    ) -> BoxFuture<'a, ExchangeResult<()>>;

    /// Close a tracked order.
    fn close_order<'a>(
        &'a self,
        symbol: &'a Symbol,
        tracking_no: &'a TrackingNo,
    ) -> BoxFuture<'a, ExchangeResult<()>>;
}

/// Arc wrapper for ExchangeApi trait objects.
pub type DynExchange = Arc<dyn ExchangeApi>;
