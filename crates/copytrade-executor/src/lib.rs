//! Trade orchestration for the copy-trade webhook bridge.
//!
//! Turns a validated `TradeInstruction` into the exchange call sequence that
//! opens a position with stop levels, or closes the tracked position.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pause;
pub mod symbol_lock;

pub use config::ExecutorConfig;
pub use error::{TradeError, TradeResult};
pub use orchestrator::TradeOrchestrator;
pub use pause::{Pause, TokioPause};
pub use symbol_lock::SymbolLocks;
