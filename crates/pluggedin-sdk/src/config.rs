//! Client configuration.

use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://plugged.in";

/// Settings for [`PluggedIn`](crate::PluggedIn).
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, e.g. `https://plugged.in` or `http://localhost:12005`.
    pub base_url: String,
    pub api_key: Option<String>,
    /// Whole-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
    /// Whether the server supports the single-request clipboard clear.
    /// When false, `clear_all` lists and deletes entries one by one.
    pub bulk_clear: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: None,
            bulk_clear: true,
        }
    }
}

impl ClientConfig {
    /// Load from environment variables:
    ///
    /// | Variable                 | Default              |
    /// |--------------------------|----------------------|
    /// | `PLUGGEDIN_BASE_URL`     | `https://plugged.in` |
    /// | `PLUGGEDIN_API_KEY`      | unset                |
    /// | `PLUGGEDIN_TIMEOUT_SECS` | unset                |
    /// | `PLUGGEDIN_BULK_CLEAR`   | `true`               |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("PLUGGEDIN_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = lookup("PLUGGEDIN_API_KEY").filter(|v| !v.is_empty());

        let timeout = lookup("PLUGGEDIN_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_secs);

        let bulk_clear = lookup("PLUGGEDIN_BULK_CLEAR")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Self {
            base_url,
            api_key,
            timeout,
            bulk_clear,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("bulk_clear", &self.bulk_clear)
            .finish()
    }
}
