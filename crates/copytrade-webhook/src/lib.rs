//! HTTP webhook endpoint for trade instructions.
//!
//! `POST /copytrade` accepts one JSON instruction per call:
//!
//! | Result | Status | Body |
//! |---|---|---|
//! | executed | 200 | `{"message": "Successfully processed webhook data!"}` |
//! | invalid payload | 400 | `{"error": "<reason>"}` |
//! | trade failed | 500 | `{"error": "Error processing the trade."}` |
//!
//! `GET /health` answers `ok`.

pub mod config;
pub mod error;
pub mod payload;
pub mod server;

pub use config::WebhookConfig;
pub use error::{WebhookError, PROCESSING_ERROR_MESSAGE};
pub use payload::parse_instruction;
pub use server::{create_router, run_server, serve, WebhookState, SUCCESS_MESSAGE};
