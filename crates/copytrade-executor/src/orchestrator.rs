//! Trade orchestration.
//!
//! # Open sequence
//!
//! 1. Fetch available balance     → InvalidBalance if unreadable or not positive
//! 2. Size = balance × 0.20       → market order
//! 3. Place order                 → Exchange error, nothing else happens
//! 4. Wait `tracking_delay`
//! 5. Look up tracking number     → TrackingNumberNotFound (single attempt)
//! 6. Attach stop-profit/stop-loss
//!
//! # Close sequence
//!
//! 1. Look up current tracking number → TrackingNumberNotFound, no close issued
//! 2. Close the tracked order
//!
//! A failure after the order is placed leaves the position open; nothing is
//! rolled back.

use std::sync::Arc;

use copytrade_core::{CloseTrade, CoreError, OpenTrade, OrderPayload, Size, TradeInstruction};
use copytrade_exchange::{DynExchange, Lookup};
use tracing::{error, info};

use crate::config::ExecutorConfig;
use crate::error::{TradeError, TradeResult};
use crate::pause::Pause;
use crate::symbol_lock::SymbolLocks;

/// Drives one trade instruction through the exchange.
pub struct TradeOrchestrator {
    exchange: DynExchange,
    pause: Arc<dyn Pause>,
    config: ExecutorConfig,
    /// Present only when per-symbol serialization is enabled.
    symbol_locks: Option<SymbolLocks>,
}

impl TradeOrchestrator {
    pub fn new(exchange: DynExchange, pause: Arc<dyn Pause>, config: ExecutorConfig) -> Self {
        let symbol_locks = config.serialize_per_symbol.then(SymbolLocks::new);
        Self {
            exchange,
            pause,
            config,
            symbol_locks,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `instruction` to completion.
    pub async fn process_trade(&self, instruction: &TradeInstruction) -> TradeResult<()> {
        let _guard = match &self.symbol_locks {
            Some(locks) => Some(locks.acquire(instruction.symbol()).await),
            None => None,
        };

        match instruction {
            TradeInstruction::Open(open) => self.open_position(open).await,
            TradeInstruction::Close(close) => self.close_position(close).await,
        }
    }

    async fn open_position(&self, open: &OpenTrade) -> TradeResult<()> {
        let balance = self.exchange.get_balance().await?;
        let size = Size::from_balance(&balance).map_err(|e| match e {
            CoreError::InvalidBalance(detail) => TradeError::InvalidBalance(detail),
            other => TradeError::InvalidBalance(format!("{balance:?}: {other}")),
        })?;
        info!(
            symbol = %open.symbol,
            side = %open.side,
            balance = %balance,
            size = %size.to_wire_string(),
            "Opening position"
        );

        let payload = OrderPayload::for_open(open, size);
        let response = self.exchange.place_order(&payload).await?;
        info!(symbol = %open.symbol, response = %response, "Order placed");

        self.pause.pause(self.config.tracking_delay()).await;

        let tracking_no = match self
            .exchange
            .get_tracking_no_after_order(&open.symbol)
            .await?
        {
            Lookup::Found(tracking_no) => tracking_no,
            Lookup::NotFound => {
                error!(
                    symbol = %open.symbol,
                    "Order placed but no tracking number found; position has no stop levels"
                );
                return Err(TradeError::TrackingNumberNotFound {
                    symbol: open.symbol.clone(),
                });
            }
        };

        if let Err(e) = self
            .exchange
            .modify_tpsl(
                &tracking_no,
                &open.symbol,
                &open.stop_profit_price,
                &open.stop_loss_price,
            )
            .await
        {
            error!(
                symbol = %open.symbol,
                tracking_no = %tracking_no,
                error = %e,
                "Failed to attach stop levels; position remains open"
            );
            return Err(e.into());
        }

        info!(
            symbol = %open.symbol,
            tracking_no = %tracking_no,
            stop_profit_price = %open.stop_profit_price,
            stop_loss_price = %open.stop_loss_price,
            "Stop levels attached"
        );
        Ok(())
    }

    async fn close_position(&self, close: &CloseTrade) -> TradeResult<()> {
        let tracking_no = match self
            .exchange
            .get_current_order_tracking_no(&close.symbol)
            .await?
        {
            Lookup::Found(tracking_no) => tracking_no,
            Lookup::NotFound => {
                return Err(TradeError::TrackingNumberNotFound {
                    symbol: close.symbol.clone(),
                })
            }
        };

        self.exchange.close_order(&close.symbol, &tracking_no).await?;
        info!(symbol = %close.symbol, tracking_no = %tracking_no, "Position closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use copytrade_core::{Symbol, TrackingNo};
    use copytrade_exchange::{BoxFuture, ExchangeCall, ExchangeError, MockExchange};
    use parking_lot::Mutex;
    use tokio_test::{assert_err, assert_ok};

    /// Records each pause into the exchange mock's call log.
    struct RecordingPause {
        mock: Arc<MockExchange>,
        durations: Mutex<Vec<Duration>>,
        sleep: Duration,
    }

    impl RecordingPause {
        fn new(mock: Arc<MockExchange>) -> Self {
            Self {
                mock,
                durations: Mutex::new(Vec::new()),
                sleep: Duration::ZERO,
            }
        }

        fn sleeping(mock: Arc<MockExchange>, sleep: Duration) -> Self {
            Self {
                sleep,
                ..Self::new(mock)
            }
        }
    }

    impl Pause for RecordingPause {
        fn pause(&self, duration: Duration) -> BoxFuture<'_, ()> {
            self.mock.mark("wait");
            self.durations.lock().push(duration);
            Box::pin(tokio::time::sleep(self.sleep))
        }
    }

    type Fixture = (Arc<MockExchange>, Arc<RecordingPause>, TradeOrchestrator);

    fn setup(config: ExecutorConfig) -> Fixture {
        setup_with_sleep(config, Duration::ZERO)
    }

    fn setup_with_sleep(config: ExecutorConfig, sleep: Duration) -> Fixture {
        let mock = Arc::new(MockExchange::new());
        let pause = Arc::new(RecordingPause::sleeping(mock.clone(), sleep));
        let orchestrator = TradeOrchestrator::new(mock.clone(), pause.clone(), config);
        (mock, pause, orchestrator)
    }

    fn open_btc() -> TradeInstruction {
        TradeInstruction::from_fields(
            Some("BTCUSDT_UMCBL"),
            Some("0"),
            Some("open_long"),
            Some("70000"),
            Some("60000"),
        )
        .unwrap()
    }

    fn close(symbol: &str) -> TradeInstruction {
        TradeInstruction::from_fields(Some(symbol), Some("1"), None, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_open_call_sequence() {
        let (mock, pause, orchestrator) = setup(ExecutorConfig::default());
        mock.set_balance("500");

        assert_ok!(orchestrator.process_trade(&open_btc()).await);

        let symbol = Symbol::from("BTCUSDT_UMCBL");
        assert_eq!(
            mock.calls(),
            vec![
                ExchangeCall::GetBalance,
                ExchangeCall::PlaceOrder(OrderPayload {
                    symbol: "BTCUSDT_UMCBL".to_string(),
                    margin_coin: "USDT".to_string(),
                    size: "100.0".to_string(),
                    side: "open_long".to_string(),
                    order_type: "market".to_string(),
                }),
                ExchangeCall::Marker("wait"),
                ExchangeCall::GetTrackingNoAfterOrder(symbol.clone()),
                ExchangeCall::ModifyTpsl {
                    tracking_no: TrackingNo::new("T-1"),
                    symbol,
                    stop_profit_price: "70000".to_string(),
                    stop_loss_price: "60000".to_string(),
                },
            ]
        );
        assert_eq!(*pause.durations.lock(), vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_open_uses_configured_delay() {
        let config = ExecutorConfig {
            tracking_delay_ms: 250,
            ..Default::default()
        };
        let (_mock, pause, orchestrator) = setup(config);

        assert_ok!(orchestrator.process_trade(&open_btc()).await);
        assert_eq!(*pause.durations.lock(), vec![Duration::from_millis(250)]);
    }

    #[tokio::test]
    async fn test_open_place_failure_skips_wait_and_lookup() {
        let (mock, pause, orchestrator) = setup(ExecutorConfig::default());
        mock.fail("place_order", 500, r#"{"msg":"server error"}"#);

        let err = assert_err!(orchestrator.process_trade(&open_btc()).await);
        match err {
            TradeError::Exchange(ExchangeError::Rejected { status, body, .. }) => {
                assert_eq!(status, 500);
                assert!(body.contains("server error"));
            }
            other => panic!("expected exchange rejection, got {other:?}"),
        }

        assert_eq!(mock.exchange_call_count(), 2);
        assert!(pause.durations.lock().is_empty());
        assert!(!mock
            .calls()
            .iter()
            .any(|c| matches!(c, ExchangeCall::GetTrackingNoAfterOrder(_))));
    }

    #[tokio::test]
    async fn test_open_missing_tracking_no_fails_after_single_lookup() {
        let (mock, pause, orchestrator) = setup(ExecutorConfig::default());
        mock.set_tracking_after_order(None);

        let err = assert_err!(orchestrator.process_trade(&open_btc()).await);
        assert!(matches!(
            err,
            TradeError::TrackingNumberNotFound { ref symbol } if symbol.as_str() == "BTCUSDT_UMCBL"
        ));

        let calls = mock.calls();
        assert_eq!(pause.durations.lock().len(), 1);
        assert_eq!(
            calls
                .iter()
                .filter(|c| matches!(c, ExchangeCall::GetTrackingNoAfterOrder(_)))
                .count(),
            1
        );
        assert!(!calls
            .iter()
            .any(|c| matches!(c, ExchangeCall::ModifyTpsl { .. })));
    }

    #[tokio::test]
    async fn test_open_modify_failure_propagates() {
        let (mock, _pause, orchestrator) = setup(ExecutorConfig::default());
        mock.fail("modify_tpsl", 200, r#"{"error":"bad tracking number"}"#);

        let err = assert_err!(orchestrator.process_trade(&open_btc()).await);
        assert!(matches!(err, TradeError::Exchange(_)));
        assert!(err.to_string().contains("bad tracking number"));
    }

    #[tokio::test]
    async fn test_open_invalid_balance_places_nothing() {
        for balance in ["abc", "0", "-10", ""] {
            let (mock, _pause, orchestrator) = setup(ExecutorConfig::default());
            mock.set_balance(balance);

            let err = assert_err!(orchestrator.process_trade(&open_btc()).await);
            match &err {
                TradeError::InvalidBalance(detail) => {
                    assert!(detail.contains(&format!("{balance:?}")), "{detail}")
                }
                other => panic!("balance {balance:?} gave {other:?}"),
            }
            assert_eq!(mock.calls(), vec![ExchangeCall::GetBalance]);
        }
    }

    #[tokio::test]
    async fn test_open_balance_failure_places_nothing() {
        let (mock, _pause, orchestrator) = setup(ExecutorConfig::default());
        mock.fail("get_balance", 401, "unauthorized");

        let err = assert_err!(orchestrator.process_trade(&open_btc()).await);
        assert!(matches!(err, TradeError::Exchange(_)));
        assert_eq!(mock.exchange_call_count(), 1);
    }

    #[tokio::test]
    async fn test_close_call_sequence() {
        let (mock, pause, orchestrator) = setup(ExecutorConfig::default());
        mock.set_current_tracking(Some("TRK-9"));

        assert_ok!(orchestrator.process_trade(&close("ETHUSDT_UMCBL")).await);

        let symbol = Symbol::from("ETHUSDT_UMCBL");
        assert_eq!(
            mock.calls(),
            vec![
                ExchangeCall::GetCurrentOrderTrackingNo(symbol.clone()),
                ExchangeCall::CloseOrder {
                    symbol,
                    tracking_no: TrackingNo::new("TRK-9"),
                },
            ]
        );
        assert!(pause.durations.lock().is_empty());
    }

    #[tokio::test]
    async fn test_close_without_tracking_no_issues_no_close() {
        let (mock, _pause, orchestrator) = setup(ExecutorConfig::default());
        mock.set_current_tracking(None);

        let err = assert_err!(orchestrator.process_trade(&close("BTCUSDT_UMCBL")).await);
        assert!(matches!(err, TradeError::TrackingNumberNotFound { .. }));
        assert_eq!(
            mock.calls(),
            vec![ExchangeCall::GetCurrentOrderTrackingNo(Symbol::from(
                "BTCUSDT_UMCBL"
            ))]
        );
    }

    #[tokio::test]
    async fn test_close_failure_propagates() {
        let (mock, _pause, orchestrator) = setup(ExecutorConfig::default());
        mock.fail("close_order", 400, r#"{"code":"40001","msg":"closed already"}"#);

        let err = assert_err!(orchestrator.process_trade(&close("BTCUSDT_UMCBL")).await);
        assert!(err.to_string().contains("closed already"));
    }

    #[tokio::test]
    async fn test_concurrent_trades_interleave_by_default() {
        let (mock, _pause, orchestrator) =
            setup_with_sleep(ExecutorConfig::default(), Duration::from_millis(20));
        let first = open_btc();
        let second = open_btc();

        let (a, b) = tokio::join!(
            orchestrator.process_trade(&first),
            orchestrator.process_trade(&second)
        );
        assert_ok!(a);
        assert_ok!(b);

        let calls = mock.calls();
        assert_eq!(calls[3], ExchangeCall::GetBalance);
    }

    #[tokio::test]
    async fn test_serialize_per_symbol_runs_sequences_one_at_a_time() {
        let config = ExecutorConfig {
            serialize_per_symbol: true,
            ..Default::default()
        };
        let (mock, _pause, orchestrator) = setup_with_sleep(config, Duration::from_millis(20));
        let first = open_btc();
        let second = open_btc();

        let (a, b) = tokio::join!(
            orchestrator.process_trade(&first),
            orchestrator.process_trade(&second)
        );
        assert_ok!(a);
        assert_ok!(b);

        let calls = mock.calls();
        assert_eq!(calls.len(), 10);
        assert!(matches!(calls[4], ExchangeCall::ModifyTpsl { .. }));
        assert_eq!(calls[5], ExchangeCall::GetBalance);
    }
}
