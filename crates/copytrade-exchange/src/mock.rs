//! Recording exchange mock for testing.
//!
//! Records every call in order and answers with scripted results, so tests
//! can assert the exact call sequence an orchestration produced.

use std::collections::HashMap;

use copytrade_core::{OrderPayload, Price, Symbol, TrackingNo};
use parking_lot::Mutex;

use crate::api::{BoxFuture, ExchangeApi, Lookup};
use crate::error::{ExchangeError, ExchangeResult};

/// A call observed by [`MockExchange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeCall {
    GetBalance,
    PlaceOrder(OrderPayload),
    GetTrackingNoAfterOrder(Symbol),
    GetCurrentOrderTrackingNo(Symbol),
    ModifyTpsl {
        tracking_no: TrackingNo,
        symbol: Symbol,
        stop_profit_price: String,
        stop_loss_price: String,
    },
    CloseOrder {
        symbol: Symbol,
        tracking_no: TrackingNo,
    },
    /// Non-exchange event recorded by the test harness (e.g., a pause).
    Marker(&'static str),
}

/// Mock exchange for testing.
#[derive(Debug)]
pub struct MockExchange {
    calls: Mutex<Vec<ExchangeCall>>,
    balance: Mutex<String>,
    tracking_after_order: Mutex<Option<TrackingNo>>,
    current_tracking: Mutex<Option<TrackingNo>>,
    /// Scripted rejections keyed by operation name.
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchange {
    /// Balance "1000", tracking number "T-1" for both lookups, every call succeeds.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            balance: Mutex::new("1000".to_string()),
            tracking_after_order: Mutex::new(Some(TrackingNo::new("T-1"))),
            current_tracking: Mutex::new(Some(TrackingNo::new("T-1"))),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_balance(&self, balance: &str) {
        *self.balance.lock() = balance.to_string();
    }

    pub fn set_tracking_after_order(&self, tracking_no: Option<&str>) {
        *self.tracking_after_order.lock() = tracking_no.map(TrackingNo::new);
    }

    pub fn set_current_tracking(&self, tracking_no: Option<&str>) {
        *self.current_tracking.lock() = tracking_no.map(TrackingNo::new);
    }

    /// Make `operation` fail as if the exchange answered `status body`.
    ///
    /// Operation names: `get_balance`, `place_order`, `modify_tpsl`,
    /// `close_order`, `get_tracking_no_after_order`,
    /// `get_current_order_tracking_no`.
    pub fn fail(&self, operation: &'static str, status: u16, body: &str) {
        self.failures
            .lock()
            .insert(operation, (status, body.to_string()));
    }

    /// Record a non-exchange event in the call log.
    pub fn mark(&self, label: &'static str) {
        self.calls.lock().push(ExchangeCall::Marker(label));
    }

    /// Get recorded calls.
    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded exchange calls (markers excluded).
    pub fn exchange_call_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| !matches!(c, ExchangeCall::Marker(_)))
            .count()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: ExchangeCall) {
        self.calls.lock().push(call);
    }

    fn scripted_failure(&self, operation: &'static str) -> ExchangeResult<()> {
        match self.failures.lock().get(operation) {
            Some((status, body)) => Err(ExchangeError::Rejected {
                operation,
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl ExchangeApi for MockExchange {
    fn get_balance(&self) -> BoxFuture<'_, ExchangeResult<String>> {
        Box::pin(async move {
            self.record(ExchangeCall::GetBalance);
            self.scripted_failure("get_balance")?;
            Ok(self.balance.lock().clone())
        })
    }

    fn place_order<'a>(
        &'a self,
        payload: &'a OrderPayload,
    ) -> BoxFuture<'a, ExchangeResult<serde_json::Value>> {
        Box::pin(async move {
            self.record(ExchangeCall::PlaceOrder(payload.clone()));
            self.scripted_failure("place_order")?;
            Ok(serde_json::json!({
                "code": "00000",
                "msg": "success",
                "data": {"orderId": "mock-order-1", "clientOid": null}
            }))
        })
    }

    fn get_tracking_no_after_order<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> BoxFuture<'a, ExchangeResult<Lookup<TrackingNo>>> {
        Box::pin(async move {
            self.record(ExchangeCall::GetTrackingNoAfterOrder(symbol.clone()));
            if self.scripted_failure("get_tracking_no_after_order").is_err() {
                return Ok(Lookup::NotFound);
            }
            Ok(match self.tracking_after_order.lock().clone() {
                Some(tracking_no) => Lookup::Found(tracking_no),
                None => Lookup::NotFound,
            })
        })
    }

    fn get_current_order_tracking_no<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> BoxFuture<'a, ExchangeResult<Lookup<TrackingNo>>> {
        Box::pin(async move {
            self.record(ExchangeCall::GetCurrentOrderTrackingNo(symbol.clone()));
            if self.scripted_failure("get_current_order_tracking_no").is_err() {
                return Ok(Lookup::NotFound);
            }
            Ok(match self.current_tracking.lock().clone() {
                Some(tracking_no) => Lookup::Found(tracking_no),
                None => Lookup::NotFound,
            })
        })
    }

    fn modify_tpsl<'a>(
        &'a self,
        tracking_no: &'a TrackingNo,
        symbol: &'a Symbol,
        stop_profit_price: &'a Price,
        stop_loss_price: &'a Price,
    ) -> BoxFuture<'a, ExchangeResult<()>> {
        Box::pin(async move {
            self.record(ExchangeCall::ModifyTpsl {
                tracking_no: tracking_no.clone(),
                symbol: symbol.clone(),
                stop_profit_price: stop_profit_price.as_str().to_string(),
                stop_loss_price: stop_loss_price.as_str().to_string(),
            });
            self.scripted_failure("modify_tpsl")
        })
    }

    fn close_order<'a>(
        &'a self,
        symbol: &'a Symbol,
        tracking_no: &'a TrackingNo,
    ) -> BoxFuture<'a, ExchangeResult<()>> {
        Box::pin(async move {
            self.record(ExchangeCall::CloseOrder {
                symbol: symbol.clone(),
                tracking_no: tracking_no.clone(),
            });
            self.scripted_failure("close_order")
        })
    }
}
