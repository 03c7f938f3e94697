//! Normalized Response envelope and message extraction.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ApiError, FailureKind};

/// Message returned when no response was received.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Fields probed, in order, for an error message in a JSON object body.
const MESSAGE_FIELDS: [&str; 3] = ["message", "error", "detail"];

/// Uniform outcome of a gateway call.
///
/// `ok` is true iff a response arrived with a 2xx status. When `ok` is
/// false, `message` is always a non-empty string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse {
    ok: bool,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ApiResponse {
    /// Outcome for a call that never received a response.
    pub fn network_error() -> Self {
        Self {
            ok: false,
            status: 0,
            data: None,
            message: Some(NETWORK_ERROR_MESSAGE.to_string()),
        }
    }

    /// Normalize a received status and raw body.
    ///
    /// Success bodies that aren't JSON are kept as a string value; an empty
    /// success body yields no data.
    pub fn from_parts(status: StatusCode, body: &str) -> Self {
        let decoded = serde_json::from_str::<Value>(body).ok();

        if status.is_success() {
            let data = match decoded {
                Some(value) => Some(value),
                None if body.trim().is_empty() => None,
                None => Some(Value::String(body.to_string())),
            };
            return Self {
                ok: true,
                status: status.as_u16(),
                data,
                message: None,
            };
        }

        let message = match &decoded {
            Some(value) => message_from_json(value),
            None => non_empty(body),
        }
        .unwrap_or_else(|| synthesized_message(status));

        Self {
            ok: false,
            status: status.as_u16(),
            data: decoded,
            message: Some(message),
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// HTTP status, or 0 when no response arrived.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Decoded body. On failure this is the decoded error body, if any.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Failure message; `None` on success.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Failure class; `None` on success.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        (!self.ok).then(|| FailureKind::from_status(self.status))
    }

    /// Convert into a `Result` over the raw data.
    pub fn into_result(self) -> Result<Option<Value>, ApiError> {
        if self.ok {
            return Ok(self.data);
        }
        let message = self
            .message
            .unwrap_or_else(|| NETWORK_ERROR_MESSAGE.to_string());
        Err(ApiError::from_failure(self.status, message))
    }

    /// Convert into a typed value. Missing data decodes from `null`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let data = self.into_result()?.unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }
}

/// Best-effort message from a decoded error body.
///
/// Tries the bare string, then `message`, `error`, `detail`, then a JSON
/// dump of the whole value.
fn message_from_json(value: &Value) -> Option<String> {
    if let Value::String(s) = value {
        if let Some(m) = non_empty(s) {
            return Some(m);
        }
    }

    for field in MESSAGE_FIELDS {
        if let Some(Value::String(s)) = value.get(field) {
            if let Some(m) = non_empty(s) {
                return Some(m);
            }
        }
    }

    match value {
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// `s` unchanged, unless it is blank.
fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

/// `Error: <code> (<reason>)`.
fn synthesized_message(status: StatusCode) -> String {
    format!(
        "Error: {} ({})",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
