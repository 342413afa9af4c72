//! HTTP server implementation using axum.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use copytrade_executor::TradeOrchestrator;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::payload::parse_instruction;

/// Body returned when an instruction was executed.
pub const SUCCESS_MESSAGE: &str = "Successfully processed webhook data!";

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct WebhookState {
    orchestrator: Arc<TradeOrchestrator>,
}

impl WebhookState {
    pub fn new(orchestrator: Arc<TradeOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Create the axum router.
pub fn create_router(state: WebhookState, config: &WebhookConfig) -> Router {
    Router::new()
        .route(&config.path, post(handle_webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Receive one trade instruction and run it to completion.
///
/// The body is parsed regardless of `Content-Type`, since alerting tools
/// often send JSON as `text/plain`. The trade runs on its own task, so a
/// client that hangs up mid-sequence does not stop it between placing the
/// order and attaching stop levels.
async fn handle_webhook(
    State(state): State<WebhookState>,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::BadRequest(format!("Invalid JSON body: {e}")))?;
    info!(payload = %payload, "Received webhook data");

    let instruction = parse_instruction(&payload)?;
    let orchestrator = Arc::clone(&state.orchestrator);
    let (instruction, result) = tokio::spawn(async move {
        let result = orchestrator.process_trade(&instruction).await;
        (instruction, result)
    })
    .await?;
    result?;

    info!(
        symbol = %instruction.symbol(),
        is_close = instruction.is_close(),
        "Trade processed"
    );
    Ok(Json(json!({ "message": SUCCESS_MESSAGE })))
}

async fn health() -> &'static str {
    "ok"
}

/// Serve the webhook on an already bound listener until Ctrl+C.
///
/// Requests still being answered are allowed to finish before returning.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Webhook server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down webhook server");
}

/// Bind the configured address and run the webhook server.
pub async fn run_server(state: WebhookState, config: &WebhookConfig) -> std::io::Result<()> {
    let router = create_router(state, config);
    info!(addr = %config.bind_addr(), path = %config.path, "Starting webhook server");
    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve(listener, router).await
}
