//! HTTP client for the exchange's signed REST API.
//!
//! Each operation issues exactly one signed request and validates the
//! response envelope (see [`crate::response`]). Requests and responses are
//! logged for audit; credentials never are.

use std::sync::Arc;

use copytrade_core::{
    CloseTrackPayload, ModifyTpslPayload, OrderPayload, Price, Symbol, TrackingNo,
};
use reqwest::{Client, Method};
use tracing::{debug, info};

use crate::api::{BoxFuture, ExchangeApi, Lookup};
use crate::config::{ExchangeConfig, TrackingQueryConfig};
use crate::error::{ExchangeError, ExchangeResult};
use crate::response::{self, RawResponse};
use crate::signer::{Clock, RequestSigner, SystemClock};

pub const ACCOUNTS_PATH: &str = "/api/mix/v1/account/accounts";
pub const PLACE_ORDER_PATH: &str = "/api/mix/v1/order/placeOrder";
pub const CURRENT_TRACK_PATH: &str = "/api/mix/v1/trace/currentTrack";
pub const MODIFY_TPSL_PATH: &str = "/api/mix/v1/trace/modifyTPSL";
pub const CLOSE_TRACK_PATH: &str = "/api/mix/v1/trace/closeTrackOrder";

/// Page size of the current-order tracking lookup.
const CURRENT_TRACK_PAGE_SIZE: u32 = 20;

/// Client for the exchange's copy-trading endpoints.
pub struct ExchangeClient {
    /// HTTP client.
    client: Client,
    /// REST base URL without trailing slash.
    base_url: String,
    /// Product type tag for account and tracking queries.
    product_type: String,
    /// Query used right after an order is placed.
    tracking_query: TrackingQueryConfig,
    /// Request signer.
    signer: RequestSigner,
}

impl ExchangeClient {
    /// Create a new exchange client.
    pub fn new(config: ExchangeConfig) -> ExchangeResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client with an explicit timestamp source.
    pub fn with_clock(config: ExchangeConfig, clock: Arc<dyn Clock>) -> ExchangeResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExchangeError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        let signer = RequestSigner::with_clock(config.credentials.clone(), &config.locale, clock);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            product_type: config.product_type.clone(),
            tracking_query: config.tracking_query.clone(),
            signer,
        })
    }

    /// Path of the account list query.
    fn accounts_path(&self) -> String {
        format!(
            "{ACCOUNTS_PATH}{}",
            query_string(&[("productType", self.product_type.as_str())])
        )
    }

    /// Path of a current-track query.
    fn current_track_path(&self, symbol: &str, page_size: u32, page_no: u32) -> String {
        format!(
            "{CURRENT_TRACK_PATH}{}",
            query_string(&[
                ("symbol", symbol),
                ("productType", self.product_type.as_str()),
                ("pageSize", &page_size.to_string()),
                ("pageNo", &page_no.to_string()),
            ])
        )
    }

    /// Sign and send one request. Fails only if no response was received.
    async fn execute(
        &self,
        operation: &'static str,
        method: Method,
        request_path: &str,
        body: &str,
    ) -> ExchangeResult<RawResponse> {
        let signed = self.signer.sign_request(method.as_str(), request_path, body)?;
        let url = format!("{}{}", self.base_url, request_path);

        info!(
            operation,
            method = %signed.method,
            path = %request_path,
            body = %body,
            "Sending exchange request"
        );
        debug!(operation, timestamp = signed.timestamp, "Request signed");

        let mut request = self.client.request(method, &url);
        for (name, value) in signed.headers() {
            request = request.header(*name, value);
        }
        if !body.is_empty() {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::Transport {
                operation,
                detail: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport {
                operation,
                detail: format!("failed to read body: {e}"),
            })?;

        info!(operation, status, body = %text, "Received exchange response");

        Ok(RawResponse::new(status, text))
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        payload: &T,
    ) -> ExchangeResult<serde_json::Value> {
        let body = serde_json::to_string(payload)?;
        let raw = self.execute(operation, Method::POST, path, &body).await?;
        response::accepted(operation, &raw)
    }

    async fn lookup_tracking_no(
        &self,
        operation: &'static str,
        request_path: String,
    ) -> ExchangeResult<Lookup<TrackingNo>> {
        let raw = self
            .execute(operation, Method::GET, &request_path, "")
            .await?;
        let lookup = response::first_tracking_no(operation, &raw);
        if let Lookup::Found(tracking_no) = &lookup {
            info!(operation, tracking_no = %tracking_no, "Fetched trackingNo");
        }
        Ok(lookup)
    }
}

impl ExchangeApi for ExchangeClient {
    fn get_balance(&self) -> BoxFuture<'_, ExchangeResult<String>> {
        Box::pin(async move {
            const OP: &str = "get_balance";
            let raw = self
                .execute(OP, Method::GET, &self.accounts_path(), "")
                .await?;
            let available = response::available_balance(OP, &raw)?;
            info!(available = %available, "Fetched available balance");
            Ok(available)
        })
    }

    fn place_order<'a>(
        &'a self,
        payload: &'a OrderPayload,
    ) -> BoxFuture<'a, ExchangeResult<serde_json::Value>> {
        Box::pin(async move {
            info!(
                symbol = %payload.symbol,
                side = %payload.side,
                size = %payload.size,
                "Placing order"
            );
            self.post_json("place_order", PLACE_ORDER_PATH, payload)
                .await
        })
    }

    fn get_tracking_no_after_order<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> BoxFuture<'a, ExchangeResult<Lookup<TrackingNo>>> {
        Box::pin(async move {
            let query = &self.tracking_query;
            let query_symbol = query.symbol.as_deref().unwrap_or(symbol.as_str());
            let path = self.current_track_path(query_symbol, query.page_size, query.page_no);
            self.lookup_tracking_no("get_tracking_no_after_order", path)
                .await
        })
    }

    fn get_current_order_tracking_no<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> BoxFuture<'a, ExchangeResult<Lookup<TrackingNo>>> {
        Box::pin(async move {
            info!(symbol = %symbol, "Getting current order tracking number");
            let path = self.current_track_path(symbol.as_str(), CURRENT_TRACK_PAGE_SIZE, 1);
            self.lookup_tracking_no("get_current_order_tracking_no", path)
                .await
        })
    }

    fn modify_tpsl<'a>(
        &'a self,
        tracking_no: &'a TrackingNo,
        symbol: &'a Symbol,
        stop_profit_price: &'a Price,
        stop_loss_price: &'a Price,
    ) -> BoxFuture<'a, ExchangeResult<()>> {
        Box::pin(async move {
            info!(tracking_no = %tracking_no, "Modifying TP/SL");
            let payload =
                ModifyTpslPayload::new(tracking_no, symbol, stop_profit_price, stop_loss_price);
            self.post_json("modify_tpsl", MODIFY_TPSL_PATH, &payload)
                .await
                .map(|_| ())
        })
    }

    fn close_order<'a>(
        &'a self,
        symbol: &'a Symbol,
        tracking_no: &'a TrackingNo,
    ) -> BoxFuture<'a, ExchangeResult<()>> {
        Box::pin(async move {
            info!(symbol = %symbol, tracking_no = %tracking_no, "Closing tracked order");
            let payload = CloseTrackPayload::new(symbol, tracking_no);
            self.post_json("close_order", CLOSE_TRACK_PATH, &payload)
                .await
                .map(|_| ())
        })
    }
}

/// Build `?k1=v1&k2=v2` with URL-encoded values, preserving order.
pub fn query_string(params: &[(&str, &str)]) -> String {
    let joined = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}
