//! Response validation.
//!
//! The exchange wraps every payload in an envelope:
//!
//! ```json
//! {"code": "00000", "msg": "success", "requestTime": 1700000000000, "data": ...}
//! ```
//!
//! A response is accepted only with HTTP 200, a JSON body, no `error` key and
//! (when present) a success `code`.

use copytrade_core::TrackingNo;
use serde_json::Value;
use tracing::warn;

use crate::api::Lookup;
use crate::error::{ExchangeError, ExchangeResult};

/// Envelope code the exchange uses for success.
pub const SUCCESS_CODE: &str = "00000";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Why a parsed body counts as a rejection, if it does.
pub fn rejection_reason(value: &Value) -> Option<String> {
    if let Some(error) = value.get("error") {
        return Some(format!("error: {error}"));
    }
    match value.get("code").and_then(scalar_to_string) {
        Some(code) if code != SUCCESS_CODE => {
            let msg = value
                .get("msg")
                .and_then(scalar_to_string)
                .unwrap_or_default();
            Some(format!("code {code}: {msg}"))
        }
        _ => None,
    }
}

/// Validate a response to a mutating call and return its parsed body.
pub fn accepted(operation: &'static str, raw: &RawResponse) -> ExchangeResult<Value> {
    if !raw.is_ok() {
        return Err(rejected(operation, raw));
    }

    let value: Value =
        serde_json::from_str(&raw.body).map_err(|e| ExchangeError::UnexpectedResponse {
            operation,
            detail: format!("body is not JSON ({e}): {}", raw.body),
        })?;

    if rejection_reason(&value).is_some() {
        return Err(rejected(operation, raw));
    }

    Ok(value)
}

/// Extract `data[0].available` from an account list response.
pub fn available_balance(operation: &'static str, raw: &RawResponse) -> ExchangeResult<String> {
    let value = accepted(operation, raw)?;

    let first = first_data_entry(&value).ok_or_else(|| ExchangeError::UnexpectedResponse {
        operation,
        detail: "data is missing or empty".to_string(),
    })?;

    first
        .get("available")
        .and_then(scalar_to_string)
        .ok_or_else(|| ExchangeError::UnexpectedResponse {
            operation,
            detail: "available balance not found in first account".to_string(),
        })
}

/// Extract `data[0].trackingNo` from a current-track response.
///
/// Every irregularity is reported as `NotFound` and logged.
pub fn first_tracking_no(operation: &'static str, raw: &RawResponse) -> Lookup<TrackingNo> {
    if !raw.is_ok() {
        warn!(operation, status = raw.status, body = %raw.body, "Tracking lookup returned non-200");
        return Lookup::NotFound;
    }

    let value: Value = match serde_json::from_str(&raw.body) {
        Ok(value) => value,
        Err(e) => {
            warn!(operation, error = %e, body = %raw.body, "Tracking lookup body is not JSON");
            return Lookup::NotFound;
        }
    };

    if let Some(reason) = rejection_reason(&value) {
        warn!(operation, reason = %reason, "Tracking lookup rejected");
        return Lookup::NotFound;
    }

    let Some(first) = first_data_entry(&value) else {
        warn!(operation, "No tracked orders in response");
        return Lookup::NotFound;
    };

    match first.get("trackingNo").and_then(scalar_to_string) {
        Some(tracking_no) if !tracking_no.is_empty() => Lookup::Found(TrackingNo::new(tracking_no)),
        _ => {
            warn!(operation, "First tracked order has no trackingNo");
            Lookup::NotFound
        }
    }
}

fn first_data_entry(value: &Value) -> Option<&Value> {
    value.get("data")?.as_array()?.first()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn rejected(operation: &'static str, raw: &RawResponse) -> ExchangeError {
    ExchangeError::Rejected {
        operation,
        status: raw.status,
        body: raw.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BALANCE: &str =
        r#"{"code":"00000","msg":"success","data":[{"marginCoin":"USDT","available":"500"}]}"#;

    #[test]
    fn test_available_balance() {
        let raw = RawResponse::new(200, OK_BALANCE);
        assert_eq!(available_balance("get_balance", &raw).unwrap(), "500");
    }

    #[test]
    fn test_available_balance_numeric() {
        let raw = RawResponse::new(200, r#"{"data":[{"available":1234.5}]}"#);
        assert_eq!(available_balance("get_balance", &raw).unwrap(), "1234.5");
    }

    #[test]
    fn test_available_balance_failures() {
        let cases = [
            RawResponse::new(500, OK_BALANCE),
            RawResponse::new(200, r#"{"error":"bad things"}"#),
            RawResponse::new(200, r#"{"code":"40009","msg":"sign signature error"}"#),
            RawResponse::new(200, r#"{"data":[]}"#),
            RawResponse::new(200, r#"{"data":{"available":"1"}}"#),
            RawResponse::new(200, r#"{"data":[{"equity":"1"}]}"#),
            RawResponse::new(200, "<html>gateway</html>"),
        ];
        for raw in cases {
            assert!(
                available_balance("get_balance", &raw).is_err(),
                "expected failure for {raw:?}"
            );
        }
    }

    #[test]
    fn test_accepted_includes_body_in_rejection() {
        let raw = RawResponse::new(400, r#"{"code":"40762","msg":"balance not enough"}"#);
        match accepted("place_order", &raw) {
            Err(ExchangeError::Rejected {
                operation,
                status,
                body,
            }) => {
                assert_eq!(operation, "place_order");
                assert_eq!(status, 400);
                assert!(body.contains("balance not enough"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_accepted_returns_payload() {
        let raw = RawResponse::new(200, r#"{"code":"00000","data":{"orderId":"1"}}"#);
        let value = accepted("place_order", &raw).unwrap();
        assert_eq!(value["data"]["orderId"], "1");
    }

    #[test]
    fn test_first_tracking_no() {
        let raw = RawResponse::new(
            200,
            r#"{"code":"00000","data":[{"trackingNo":"111"},{"trackingNo":"222"}]}"#,
        );
        assert_eq!(
            first_tracking_no("lookup", &raw),
            Lookup::Found(TrackingNo::new("111"))
        );
    }

    #[test]
    fn test_first_tracking_no_irregular_is_not_found() {
        let cases = [
            RawResponse::new(404, r#"{"data":[{"trackingNo":"1"}]}"#),
            RawResponse::new(200, "not json"),
            RawResponse::new(200, r#"{"data":[]}"#),
            RawResponse::new(200, r#"{"data":null}"#),
            RawResponse::new(200, r#"{}"#),
            RawResponse::new(200, r#"{"data":[{"symbol":"BTCUSDT_UMCBL"}]}"#),
            RawResponse::new(200, r#"{"data":[{"trackingNo":""}]}"#),
            RawResponse::new(200, r#"{"error":"x","data":[{"trackingNo":"1"}]}"#),
        ];
        for raw in cases {
            assert_eq!(
                first_tracking_no("lookup", &raw),
                Lookup::NotFound,
                "expected NotFound for {raw:?}"
            );
        }
    }

    #[test]
    fn test_rejection_reason() {
        assert!(rejection_reason(&serde_json::json!({"code": "00000"})).is_none());
        assert!(rejection_reason(&serde_json::json!({"data": []})).is_none());
        assert!(rejection_reason(&serde_json::json!({"code": "40001", "msg": "x"})).is_some());
        assert!(rejection_reason(&serde_json::json!({"error": null})).is_some());
    }
}
