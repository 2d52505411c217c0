//! Credentials attached to outgoing requests.
//!
//! Provides the [`AuthStrategy`] trait and the API-key implementation used by
//! the Plugged.in HTTP API.

use std::fmt;

/// Trait for authenticating requests to Plugged.in.
///
/// Implementations produce header key-value pairs that [`HttpTransport`]
/// adds to every request.
///
/// [`HttpTransport`]: crate::transport::HttpTransport
pub trait AuthStrategy: Send + Sync {
    /// Produce authentication headers for a request.
    fn headers(&self) -> Vec<(String, String)>;
}

/// Bearer API-key authentication.
///
/// # Example
///
/// ```rust
/// use pluggedin_sdk::{ApiKeyAuth, AuthStrategy};
///
/// let auth = ApiKeyAuth::new("pg_in_example");
/// assert_eq!(auth.headers()[0].0, "authorization");
/// ```
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: String,
}

impl ApiKeyAuth {
    /// Create a new API-key auth strategy.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl AuthStrategy for ApiKeyAuth {
    fn headers(&self) -> Vec<(String, String)> {
        vec![(
            "authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )]
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let auth = ApiKeyAuth::new("secret-key");
        assert_eq!(
            auth.headers(),
            vec![(
                "authorization".to_string(),
                "Bearer secret-key".to_string()
            )]
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let auth = ApiKeyAuth::new("secret-key");
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("redacted"));
    }
}
