//! Per-symbol mutual exclusion for trade sequences.

use std::sync::Arc;

use copytrade_core::Symbol;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async lock per symbol, created on first use.
#[derive(Debug, Default)]
pub struct SymbolLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SymbolLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other sequence holds `symbol`, then hold it until the
    /// guard is dropped.
    pub async fn acquire(&self, symbol: &Symbol) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is not held across the await.
        let lock = self
            .locks
            .entry(symbol.as_str().to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
