//! Copy-trade webhook bridge.
//!
//! Receives trade signals over HTTP and executes them on the exchange's
//! copy-trading API:
//! - Open: market order sized from the available balance, then stop levels
//! - Close: close the tracked position for a symbol

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
