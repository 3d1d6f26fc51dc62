//! The single normalized error shape store logic sees.

use booking_contract::DecodeError;
use serde_json::Value;
use thiserror::Error;

/// Normalized failure from any API call: transport faults, 4xx/5xx responses,
/// and local serialization problems all collapse into this shape before
/// reaching the stores.
///
/// `message` prefers the backend's `detail` or `message` field; `status` and
/// `payload` are kept for callers that need more than the display string.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable failure description.
    pub message: String,
    /// HTTP status, when the failure came from a server response.
    pub status: Option<u16>,
    /// Raw response body, when one was readable.
    pub payload: Option<Value>,
}

impl ApiError {
    /// Failure that never reached the network (serialization, storage).
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    /// Transport-level failure (connection refused, aborted fetch).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::local(message)
    }

    /// Normalizes a non-2xx response, lifting `detail`/`message` body fields
    /// into the display message.
    pub fn from_response(status: u16, payload: Option<Value>) -> Self {
        let message = payload
            .as_ref()
            .and_then(|body| {
                body.get("detail")
                    .or_else(|| body.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self {
            message,
            status: Some(status),
            payload,
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        Self::local(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_field_wins_over_message_field() {
        let err = ApiError::from_response(
            400,
            Some(json!({"detail": "Invalid salon or service", "message": "other"})),
        );
        assert_eq!(err.message, "Invalid salon or service");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn message_field_is_the_fallback() {
        let err = ApiError::from_response(409, Some(json!({"message": "already exists"})));
        assert_eq!(err.message, "already exists");
    }

    #[test]
    fn bodyless_failure_reports_the_status() {
        let err = ApiError::from_response(502, None);
        assert_eq!(err.message, "request failed with status 502");
        assert_eq!(err.payload, None);
    }
}
