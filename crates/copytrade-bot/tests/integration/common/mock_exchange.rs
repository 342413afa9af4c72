//! Fake exchange HTTP server for integration tests.
//!
//! Provides a local server that:
//! - Verifies the signature headers of every request
//! - Records requests in arrival order
//! - Answers each path with a scripted status and body

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use copytrade_bot::AppConfig;
use copytrade_exchange::{sign, Credentials};
use parking_lot::Mutex;
use tokio::net::TcpListener;

pub const API_KEY: &str = "integration-key";
pub const SECRET: &str = "integration-secret";
pub const PASSPHRASE: &str = "integration-pass";

pub const ACCOUNTS: &str = "/api/mix/v1/account/accounts";
pub const PLACE_ORDER: &str = "/api/mix/v1/order/placeOrder";
pub const CURRENT_TRACK: &str = "/api/mix/v1/trace/currentTrack";
pub const MODIFY_TPSL: &str = "/api/mix/v1/trace/modifyTPSL";
pub const CLOSE_TRACK: &str = "/api/mix/v1/trace/closeTrackOrder";

/// A request received by the fake exchange.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub path_and_query: String,
    pub body: String,
    pub signature_valid: bool,
}

#[derive(Default)]
struct Inner {
    requests: Mutex<Vec<ReceivedRequest>>,
    responses: Mutex<HashMap<String, (u16, String)>>,
}

/// A fake exchange for testing.
pub struct MockExchangeServer {
    addr: SocketAddr,
    inner: Arc<Inner>,
}

impl MockExchangeServer {
    /// Start a fake exchange on an available port, answering every endpoint
    /// with a healthy default.
    pub async fn start() -> Self {
        let inner = Arc::new(Inner::default());
        let app = Router::new().fallback(handle).with_state(inner.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let server = Self { addr, inner };
        server.respond(
            ACCOUNTS,
            200,
            r#"{"code":"00000","msg":"success","data":[{"marginCoin":"USDT","available":"500"}]}"#,
        );
        server.respond(
            PLACE_ORDER,
            200,
            r#"{"code":"00000","msg":"success","data":{"orderId":"1001","clientOid":"c-1"}}"#,
        );
        server.respond(
            CURRENT_TRACK,
            200,
            r#"{"code":"00000","msg":"success","data":[{"trackingNo":"TRK-1","symbol":"BTCUSDT_UMCBL"}]}"#,
        );
        server.respond(MODIFY_TPSL, 200, r#"{"code":"00000","msg":"success","data":true}"#);
        server.respond(CLOSE_TRACK, 200, r#"{"code":"00000","msg":"success","data":true}"#);
        server
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer requests to `path` with `status` and `body`.
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.inner
            .responses
            .lock()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.inner.requests.lock().clone()
    }

    /// Paths of received requests, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// App config pointed at this server, with no settle delay.
    pub fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.exchange.base_url = self.base_url();
        config.exchange.credentials = Credentials::new(API_KEY, SECRET, PASSPHRASE);
        config.executor.tracking_delay_ms = 0;
        config
    }
}

async fn handle(
    State(inner): State<Arc<Inner>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let timestamp: u64 = header("ACCESS-TIMESTAMP")
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();
    let expected = sign(SECRET, timestamp, method.as_str(), &path_and_query, &body).unwrap();
    let signature_valid = header("ACCESS-KEY") == Some(API_KEY)
        && header("ACCESS-PASSPHRASE") == Some(PASSPHRASE)
        && header("ACCESS-SIGN") == Some(expected.as_str());

    inner.requests.lock().push(ReceivedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        path_and_query,
        body,
        signature_valid,
    });

    let (status, body) = inner
        .responses
        .lock()
        .get(uri.path())
        .cloned()
        .unwrap_or((404, r#"{"code":"40404","msg":"not found"}"#.to_string()));
    (StatusCode::from_u16(status).unwrap(), body)
}
