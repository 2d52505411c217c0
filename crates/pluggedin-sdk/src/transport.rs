//! Request/response transport between the SDK and the Plugged.in API.
//!
//! Every SDK operation talks to the server through the [`Transport`] trait:
//! `(method, path, query params, JSON body) -> (status, raw body)`. The trait
//! call is the only point where an operation suspends.
//!
//! - [`HttpTransport`] - production implementation over `reqwest`
//! - [`ScriptedTransport`] - canned responses, for tests and offline use

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::auth::AuthStrategy;
use crate::error::{error_from_payload, Error};
use crate::Result;

const USER_AGENT: &str = concat!("pluggedin-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Canonical wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call, independent of how it is carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute API path, e.g. `/api/clipboard`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw server answer: status code plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response whose body is the serialized `value`.
    pub fn json_body(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Strict JSON decode. An empty body decodes to `{}`.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Lenient decode: JSON when the body parses, otherwise the raw text as
    /// a JSON string.
    pub fn json_or_text(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Decode the body, turning HTTP failures into typed errors.
    ///
    /// A `>= 400` status whose body is a `{success, ...}` envelope is handed
    /// back as-is so the envelope parser can apply its own semantics
    /// (e.g. "not found" is absence for `get`, not an error).
    pub fn into_payload(&self, lenient: bool) -> Result<Value> {
        if self.status < 400 {
            return if lenient {
                Ok(self.json_or_text())
            } else {
                self.json()
            };
        }

        let payload = match self.json_or_text() {
            envelope @ Value::Object(_) if envelope.get("success").is_some() => {
                return Ok(envelope)
            }
            object @ Value::Object(_) => object,
            Value::String(text) if !text.trim().is_empty() => json!({ "error": text.trim() }),
            _ => json!({}),
        };
        Err(error_from_payload(self.status, &payload))
    }
}

/// Carries [`ApiRequest`]s to the server.
///
/// Implementations own connection management, timeouts and credentials;
/// the SDK layers above only build requests and interpret responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response.
    ///
    /// Non-2xx statuses are *not* errors at this level; only failures to
    /// complete the exchange are.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// HTTP transport for the Plugged.in API.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use pluggedin_sdk::{ApiKeyAuth, HttpTransport};
///
/// # fn example() -> pluggedin_sdk::Result<()> {
/// let transport = HttpTransport::new(
///     "https://plugged.in",
///     Some(Arc::new(ApiKeyAuth::new("pg_in_example"))),
///     None,
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    auth: Option<Arc<dyn AuthStrategy>>,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(
        base_url: &str,
        auth: Option<Arc<dyn AuthStrategy>>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, client, auth))
    }

    /// Create from an existing reqwest client (for sharing connection pools).
    pub fn with_client(
        base_url: &str,
        client: reqwest::Client,
        auth: Option<Arc<dyn AuthStrategy>>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(auth) = &self.auth {
            for (key, value) in auth.headers() {
                builder = builder.header(key, value);
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            method = %request.method,
            path = %request.path,
            status,
            "plugged.in request completed"
        );

        Ok(ApiResponse { status, body })
    }
}

/// Transport that replays canned responses in FIFO order.
///
/// Every request is recorded so callers can assert on exactly what would
/// have gone over the wire. Sending with no response queued is a
/// configuration error.
///
/// ```
/// use std::sync::Arc;
/// use pluggedin_sdk::{PluggedIn, ScriptedTransport};
/// use serde_json::json;
///
/// # tokio_test_block_on(async {
/// let transport = Arc::new(ScriptedTransport::new());
/// transport.push_json(200, json!({"success": true, "entries": []}));
///
/// let client = PluggedIn::builder().transport(transport.clone()).build().unwrap();
/// let entries = client.clipboard().list().await.unwrap();
/// assert!(entries.is_empty());
/// assert_eq!(transport.requests()[0].path, "/api/clipboard");
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, value: Value) -> &Self {
        self.push(Ok(ApiResponse::json_body(status, &value)))
    }

    /// Queue a raw text response.
    pub fn push_text(&self, status: u16, body: &str) -> &Self {
        self.push(Ok(ApiResponse::new(status, body)))
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: Error) -> &Self {
        self.push(Err(error))
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Number of queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }

    fn push(&self, reply: Result<ApiResponse>) -> &Self {
        lock(&self.responses).push_back(reply);
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let description = format!("{} {}", request.method, request.path);
        lock(&self.requests).push(request);
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(Error::Config(format!(
                "no scripted response left for {}",
                description
            )))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Validate an id that will be interpolated into a URL path.
pub(crate) fn path_segment<'a>(label: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::validation(format!("{} is required", label)));
    }
    if id.contains(['/', '?', '#']) {
        return Err(Error::validation(format!(
            "{} must not contain '/', '?' or '#'",
            label
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_trims_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:12005/", None, None).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:12005");
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("/api/clipboard").with_query("name", "draft");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.query_value("name"), Some("draft"));
        assert_eq!(request.query_value("idx"), None);
        assert!(request.body.is_none());

        let request = ApiRequest::delete("/api/clipboard").with_json(json!({"idx": 2}));
        assert_eq!(request.method.to_string(), "DELETE");
        assert_eq!(request.body, Some(json!({"idx": 2})));
    }

    #[test]
    fn test_empty_body_decodes_to_empty_object() {
        let response = ApiResponse::new(204, "");
        assert_eq!(response.json().unwrap(), json!({}));
    }

    #[test]
    fn test_json_or_text_keeps_plain_text() {
        let response = ApiResponse::new(200, "The answer is 42.");
        assert_eq!(response.json_or_text(), json!("The answer is 42."));

        let response = ApiResponse::new(200, r#"{"answer": "x"}"#);
        assert_eq!(response.json_or_text(), json!({"answer": "x"}));
    }

    #[test]
    fn test_error_status_with_envelope_is_returned() {
        let response = ApiResponse::json_body(404, &json!({"success": false, "error": "missing"}));
        let payload = response.into_payload(false).unwrap();
        assert_eq!(payload["error"], "missing");
    }

    #[test]
    fn test_error_status_without_envelope_maps_to_error() {
        let response = ApiResponse::json_body(401, &json!({"error": "Invalid API key"}));
        assert!(matches!(response.into_payload(false), Err(Error::Auth(_))));

        let response = ApiResponse::new(502, "<html>Bad Gateway</html>");
        match response.into_payload(true) {
            Err(Error::Request { status, message }) => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_strict_decode_rejects_text() {
        let response = ApiResponse::new(200, "not json");
        assert!(matches!(response.into_payload(false), Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_scripted_transport_replays_in_order() {
        let transport = ScriptedTransport::new();
        transport
            .push_json(200, json!({"n": 1}))
            .push_text(200, "two");

        let first = transport.send(ApiRequest::get("/a")).await.unwrap();
        let second = transport.send(ApiRequest::post("/b")).await.unwrap();
        assert_eq!(first.json().unwrap(), json!({"n": 1}));
        assert_eq!(second.body, "two");
        assert_eq!(transport.remaining(), 0);

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn test_scripted_transport_exhausted() {
        let transport = ScriptedTransport::new();
        let err = transport.send(ApiRequest::get("/api/clipboard")).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("GET /api/clipboard"));
    }

    #[test]
    fn test_path_segment_validation() {
        assert_eq!(path_segment("agent_id", " abc ").unwrap(), "abc");
        assert!(path_segment("agent_id", "").unwrap_err().is_validation());
        assert!(path_segment("agent_id", "a/b").unwrap_err().is_validation());
    }
}
