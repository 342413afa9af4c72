//! Webhook payload parsing.
//!
//! Signal sources are loose about types, so fields are read from raw JSON:
//! scalars are taken as strings, and the close flag may be sent as `is_close`
//! or `isClose`, as `"0"`/`"1"`, `0`/`1` or `false`/`true`.

use copytrade_core::TradeInstruction;
use serde_json::Value;

use crate::error::WebhookError;

/// Parse a webhook body into a validated instruction.
pub fn parse_instruction(body: &Value) -> Result<TradeInstruction, WebhookError> {
    let Some(fields) = body.as_object() else {
        return Err(WebhookError::BadRequest(
            "Payload must be a JSON object".to_string(),
        ));
    };

    let text = |key: &str| fields.get(key).and_then(scalar_text);
    let is_close = fields
        .get("is_close")
        .filter(|flag| !flag.is_null())
        .or_else(|| fields.get("isClose"))
        .and_then(close_flag);

    let instruction = TradeInstruction::from_fields(
        text("symbol").as_deref(),
        is_close.as_deref(),
        text("side").as_deref(),
        text("stopProfitPrice").as_deref(),
        text("stopLossPrice").as_deref(),
    )?;
    Ok(instruction)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn close_flag(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
