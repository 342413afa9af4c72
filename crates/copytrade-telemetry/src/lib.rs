//! Structured logging for the copy-trade webhook bridge.
//!
//! - Structured JSON logging with tracing in production
//! - Pretty console output in development
//! - Optional append-only log file

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LoggingConfig};
