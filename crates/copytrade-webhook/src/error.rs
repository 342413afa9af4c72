//! Webhook error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use copytrade_core::CoreError;
use copytrade_executor::TradeError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body returned for any orchestration failure. Details are logged only.
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing the trade.";

const MISSING_REQUIRED_MESSAGE: &str = "Symbol and is_close fields must be provided!";
const MISSING_OPEN_FIELDS_MESSAGE: &str =
    "For trades, side, stopProfitPrice, and stopLossPrice fields must be provided!";

#[derive(Debug, Error)]
pub enum WebhookError {
    /// Payload rejected before any exchange call.
    #[error("{0}")]
    BadRequest(String),

    #[error("Trade processing failed: {0}")]
    Processing(#[from] TradeError),

    /// The trade task panicked or was cancelled.
    #[error("Trade task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl From<CoreError> for WebhookError {
    fn from(err: CoreError) -> Self {
        let message = match err {
            CoreError::MissingField("symbol" | "is_close") => MISSING_REQUIRED_MESSAGE.to_string(),
            CoreError::MissingField(_) => MISSING_OPEN_FIELDS_MESSAGE.to_string(),
            other => other.to_string(),
        };
        Self::BadRequest(message)
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Processing(err) => {
                error!(error = %err, "Error processing trade");
                processing_failed()
            }
            Self::TaskFailed(err) => {
                error!(error = %err, "Trade task did not complete");
                processing_failed()
            }
        }
    }
}

fn processing_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": PROCESSING_ERROR_MESSAGE })),
    )
        .into_response()
}
