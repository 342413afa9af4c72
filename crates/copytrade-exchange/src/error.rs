//! Exchange client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("{operation}: request failed: {detail}")]
    Transport {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation}: rejected by exchange (HTTP {status}): {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation}: unexpected response: {detail}")]
    UnexpectedResponse {
        operation: &'static str,
        detail: String,
    },

    #[error("Signing error: {0}")]
    Signing(#[from] crate::signer::SignerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
