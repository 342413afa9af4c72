//! Request signing for exchange authentication.
//!
//! Every private REST call carries an HMAC-SHA256 signature over the
//! pre-hash string `timestamp + METHOD + request_path + body`, encoded in
//! standard base64:
//!
//! ```text
//! pre_hash  = "1700000000000" + "GET" + "/api/mix/v1/account/accounts?productType=umcbl" + ""
//! signature = base64(hmac_sha256(secret_key, pre_hash))
//! ```
//!
//! `request_path` includes the query string exactly as sent. Any deviation
//! (case, order, omitted body) is answered by the exchange with a 4xx.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_ACCESS_KEY: &str = "ACCESS-KEY";
pub const HEADER_ACCESS_SIGN: &str = "ACCESS-SIGN";
pub const HEADER_ACCESS_TIMESTAMP: &str = "ACCESS-TIMESTAMP";
pub const HEADER_ACCESS_PASSPHRASE: &str = "ACCESS-PASSPHRASE";
pub const HEADER_LOCALE: &str = "locale";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Trait for obtaining current time, enabling testability.
pub trait Clock: Send + Sync {
    /// Returns current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Signing errors.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// Build the pre-hash string: `timestamp + uppercase(method) + path + body`.
pub fn pre_hash(timestamp: u64, method: &str, request_path: &str, body: &str) -> String {
    let method = method.to_ascii_uppercase();
    let mut out =
        String::with_capacity(20 + method.len() + request_path.len() + body.len());
    out.push_str(&timestamp.to_string());
    out.push_str(&method);
    out.push_str(request_path);
    out.push_str(body);
    out
}

/// Compute the base64 HMAC-SHA256 signature of a request.
///
/// Pure function of its inputs.
pub fn sign(
    secret_key: &str,
    timestamp: u64,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String, SignerError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
    mac.update(pre_hash(timestamp, method, request_path, body).as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// A signed request, valid for exactly one HTTP call.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Uppercased HTTP method.
    pub method: String,
    /// Path including query string.
    pub request_path: String,
    /// Body (empty for GET).
    pub body: String,
    /// Milliseconds since Unix epoch.
    pub timestamp: u64,
    /// Base64 signature.
    pub signature: String,
    headers: Vec<(&'static str, String)>,
}

impl SignedRequest {
    /// Authentication and content headers for this request.
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }
}

/// Signs requests with the configured credentials.
pub struct RequestSigner {
    credentials: Credentials,
    locale: String,
    clock: Arc<dyn Clock>,
}

impl RequestSigner {
    pub fn new(credentials: Credentials, locale: impl Into<String>) -> Self {
        Self::with_clock(credentials, locale, Arc::new(SystemClock))
    }

    pub fn with_clock(
        credentials: Credentials,
        locale: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            locale: locale.into(),
            clock,
        }
    }

    /// Stamp the current time and sign `method request_path body`.
    pub fn sign_request(
        &self,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<SignedRequest, SignerError> {
        let timestamp = self.clock.now_ms();
        let signature = sign(
            &self.credentials.secret_key,
            timestamp,
            method,
            request_path,
            body,
        )?;

        let headers = vec![
            (HEADER_ACCESS_KEY, self.credentials.api_key.clone()),
            (HEADER_ACCESS_SIGN, signature.clone()),
            (HEADER_ACCESS_TIMESTAMP, timestamp.to_string()),
            (HEADER_ACCESS_PASSPHRASE, self.credentials.passphrase.clone()),
            (HEADER_LOCALE, self.locale.clone()),
            (HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON.to_string()),
        ];

        Ok(SignedRequest {
            method: method.to_ascii_uppercase(),
            request_path: request_path.to_string(),
            body: body.to_string(),
            timestamp,
            signature,
            headers,
        })
    }
}
