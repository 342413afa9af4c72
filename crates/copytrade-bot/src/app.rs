//! Main application wiring.
//!
//! Builds the exchange client, the trade orchestrator and the webhook router
//! from `AppConfig`, checks the account balance once, then serves webhooks.

use std::sync::Arc;

use axum::Router;
use copytrade_exchange::{DynExchange, ExchangeClient};
use copytrade_executor::{TokioPause, TradeOrchestrator};
use copytrade_webhook::{create_router, run_server, WebhookState};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Main application.
pub struct Application {
    config: AppConfig,
    exchange: DynExchange,
    orchestrator: Arc<TradeOrchestrator>,
}

impl Application {
    /// Validate `config` and build every component.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let exchange: DynExchange = Arc::new(ExchangeClient::new(config.exchange.clone())?);
        let orchestrator = Arc::new(TradeOrchestrator::new(
            exchange.clone(),
            Arc::new(TokioPause),
            config.executor.clone(),
        ));

        info!(
            base_url = %config.exchange.base_url,
            product_type = %config.exchange.product_type,
            tracking_delay_ms = config.executor.tracking_delay_ms,
            serialize_per_symbol = config.executor.serialize_per_symbol,
            "Application initialized"
        );

        Ok(Self {
            config,
            exchange,
            orchestrator,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Webhook router bound to this application's orchestrator.
    pub fn router(&self) -> Router {
        create_router(
            WebhookState::new(self.orchestrator.clone()),
            &self.config.webhook,
        )
    }

    /// Fetch and log the available balance.
    pub async fn check_balance(&self) -> AppResult<String> {
        let balance = self.exchange.get_balance().await?;
        info!(available = %balance, "Available balance");
        Ok(balance)
    }

    /// Run the startup balance check (if enabled), then serve until shutdown.
    pub async fn run(self) -> AppResult<()> {
        if self.config.startup_balance_check {
            if let Err(e) = self.check_balance().await {
                error!(error = %e, "Startup balance check failed");
                return Err(e);
            }
        }

        let state = WebhookState::new(self.orchestrator.clone());
        run_server(state, &self.config.webhook).await?;

        info!("Application stopped");
        Ok(())
    }
}
