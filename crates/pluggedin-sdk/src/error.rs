//! Error types for Plugged.in SDK operations.
//!
//! Errors fall into two families callers usually care about:
//!
//! - **validation** errors are raised locally, before any request is sent
//!   (see [`Error::is_validation`]);
//! - **service** errors are raised after a round trip, when the server
//!   reports `success: false` or breaks the response contract
//!   (see [`Error::is_service`]).
//!
//! HTTP statuses without a `{success, ...}` envelope are mapped to typed
//! variants by [`error_from_payload`].

use serde_json::Value;

/// Errors returned by Plugged.in SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid arguments, detected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The server reported a failure, or answered with a malformed success.
    #[error("{0}")]
    Service(String),

    /// The operation was withdrawn from the public API.
    #[error("{0}")]
    Removed(&'static str),

    /// Missing or rejected credentials (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The server throttled the request (HTTP 429).
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        /// Seconds the server asked us to wait, when it said so.
        retry_after: Option<u64>,
    },

    /// HTTP request failed with a non-specific status.
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// HTTP transport error (connection, DNS, TLS, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (missing URL, runtime construction, etc.).
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors raised before any I/O took place.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True for failures reported by the server inside a response body.
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Service error carrying the server's `error` field, or `default`.
    pub(crate) fn service(payload: &Value, default: &str) -> Self {
        let message = payload
            .get("error")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(default);
        Error::Service(message.to_string())
    }
}

/// Map an HTTP error status and its JSON body into a typed [`Error`].
///
/// The message is taken from `error`, then `message`, falling back to
/// `"request failed"`:
/// ```json
/// {"error": "Invalid API key"}
/// ```
pub fn error_from_payload(status: u16, payload: &Value) -> Error {
    let message = ["error", "message"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(|v| v.as_str()))
        .unwrap_or("request failed")
        .to_string();

    match status {
        401 | 403 => Error::Auth(message),
        404 => Error::NotFound(message),
        429 => {
            let retry_after = ["retryAfter", "retry_after"]
                .iter()
                .find_map(|key| payload.get(*key).and_then(|v| v.as_u64()));
            Error::RateLimited {
                message,
                retry_after,
            }
        }
        _ => Error::Request { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_statuses() {
        for status in [401, 403] {
            let err = error_from_payload(status, &json!({"error": "Invalid API key"}));
            assert!(
                matches!(err, Error::Auth(ref m) if m == "Invalid API key"),
                "status {} should map to Auth",
                status
            );
        }
    }

    #[test]
    fn test_not_found() {
        let err = error_from_payload(404, &json!({"message": "no such document"}));
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("no such document"));
    }

    #[test]
    fn test_rate_limited_reads_retry_after() {
        let err = error_from_payload(429, &json!({"error": "slow down", "retryAfter": 30}));
        match err {
            Error::RateLimited {
                message,
                retry_after,
            } => {
                assert_eq!(message, "slow down");
                assert_eq!(retry_after, Some(30));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_status_falls_back_to_request() {
        let err = error_from_payload(502, &json!({"error": "bad gateway"}));
        assert!(matches!(err, Error::Request { status: 502, .. }));
    }

    #[test]
    fn test_missing_fields() {
        let err = error_from_payload(500, &json!({}));
        assert!(matches!(err, Error::Request { status: 500, .. }));
        assert!(err.to_string().contains("request failed"));
    }

    #[test]
    fn test_service_prefers_server_message() {
        let err = Error::service(&json!({"success": false, "error": "quota exceeded"}), "fallback");
        assert!(err.is_service());
        assert_eq!(err.to_string(), "quota exceeded");

        let err = Error::service(&json!({"success": false}), "fallback");
        assert_eq!(err.to_string(), "fallback");
    }

    #[test]
    fn test_validation_is_distinguishable() {
        let err = Error::validation("name or idx is required");
        assert!(err.is_validation());
        assert!(!err.is_service());
    }
}
