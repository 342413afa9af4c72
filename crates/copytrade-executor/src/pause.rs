//! Settle delay between order placement and tracking lookup.

use std::time::Duration;

use copytrade_exchange::BoxFuture;

/// Suspends the current trade sequence for a duration.
pub trait Pause: Send + Sync {
    fn pause(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Pause backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    fn pause(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
