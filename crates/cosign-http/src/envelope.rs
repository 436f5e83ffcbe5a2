//! Decoding of the uniform `{code, message, data}` response wrapper.
//!
//! Every body the service returns is wrapped this way. `code == 0` means
//! `data` is meaningful; anything else is an application failure and `data`
//! must not reach the caller.

use crate::error::{ConsoleError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success code of the envelope.
pub const SUCCESS_CODE: i64 = 0;

/// Response wrapper shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

impl<T> Envelope<T> {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl Envelope<Value> {
    /// Success envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Envelope {
            code: SUCCESS_CODE,
            message: "success".to_string(),
            data,
        }
    }

    /// Failure envelope with `code` and `message` and null data.
    pub fn fail(code: i64, message: impl Into<String>) -> Self {
        Envelope {
            code,
            message: message.into(),
            data: Value::Null,
        }
    }
}

/// Split a raw body into `(code, message, data)` without interpreting `data`.
fn split(body: &[u8]) -> Result<(i64, Option<String>, Value)> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ConsoleError::MalformedEnvelope(format!("body is not JSON: {}", e)))?;

    let Value::Object(mut map) = value else {
        return Err(ConsoleError::MalformedEnvelope(
            "body is not a JSON object".to_string(),
        ));
    };

    let code = map
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| ConsoleError::MalformedEnvelope("missing integer `code`".to_string()))?;

    let message = map
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    let data = map.remove("data").unwrap_or(Value::Null);

    Ok((code, message, data))
}

/// Decode an envelope and classify it.
///
/// Returns `data` as `T` on `code == 0`; an [`ConsoleError::Application`]
/// with the server message (or the fixed fallback) otherwise.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let (code, message, data) = split(body)?;

    if code != SUCCESS_CODE {
        return Err(ConsoleError::application(code, message.as_deref()));
    }

    serde_json::from_value(data)
        .map_err(|e| ConsoleError::MalformedEnvelope(format!("unexpected `data` shape: {}", e)))
}

/// Best-effort server message from an error body. Used when the transport
/// status is already a failure; never fails.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
