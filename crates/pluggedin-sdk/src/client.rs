//! Async facade over the Plugged.in services.
//!
//! [`PluggedIn`] is the main entry point. Every service handle it returns
//! shares one [`Transport`], so connection pooling and credentials are set
//! up once. Use [`PluggedInBuilder`] for ergonomic construction.

use std::sync::Arc;
use std::time::Duration;

use crate::agents::Agents;
use crate::auth::{ApiKeyAuth, AuthStrategy};
use crate::clipboard::{ClearStrategy, Clipboard};
use crate::config::ClientConfig;
use crate::documents::Documents;
use crate::rag::Rag;
use crate::transport::{HttpTransport, Transport};
use crate::uploads::Uploads;
use crate::Error;

/// Async Plugged.in client.
///
/// # Example
///
/// ```rust,no_run
/// use pluggedin_sdk::{PluggedIn, WriteOptions};
///
/// # async fn example() -> pluggedin_sdk::Result<()> {
/// let client = PluggedIn::builder()
///     .base_url("http://localhost:12005")
///     .api_key("pg_in_example")
///     .build()?;
///
/// client.clipboard().set("notes", "remember the milk", &WriteOptions::new()).await?;
/// let answer = client.rag().ask_question("What did I write down?").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PluggedIn {
    transport: Arc<dyn Transport>,
    clear_strategy: ClearStrategy,
}

impl PluggedIn {
    /// Create a builder for configuring a client.
    pub fn builder() -> PluggedInBuilder {
        PluggedInBuilder::default()
    }

    /// Build a client from explicit configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        Self::builder().config(config).build()
    }

    /// Build a client from `PLUGGEDIN_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn clipboard(&self) -> Clipboard {
        Clipboard::new(Arc::clone(&self.transport), self.clear_strategy)
    }

    pub fn rag(&self) -> Rag {
        Rag::new(Arc::clone(&self.transport))
    }

    pub fn documents(&self) -> Documents {
        Documents::new(Arc::clone(&self.transport))
    }

    pub fn uploads(&self) -> Uploads {
        Uploads::new(Arc::clone(&self.transport))
    }

    pub fn agents(&self) -> Agents {
        Agents::new(Arc::clone(&self.transport))
    }

    /// The transport every service handle sends through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

/// Builder for [`PluggedIn`].
///
/// Either `base_url` or a custom `transport` must be set. When a transport
/// is given, the HTTP settings (`base_url`, `api_key`, `timeout`) are unused.
#[derive(Default)]
pub struct PluggedInBuilder {
    base_url: Option<String>,
    auth: Option<Arc<dyn AuthStrategy>>,
    timeout: Option<Duration>,
    bulk_clear: Option<bool>,
    transport: Option<Arc<dyn Transport>>,
}

impl PluggedInBuilder {
    /// Set the API root (e.g., `https://plugged.in`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Authenticate with a Plugged.in API key.
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.auth(ApiKeyAuth::new(key))
    }

    /// Set a custom authentication strategy.
    pub fn auth(mut self, auth: impl AuthStrategy + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether the server supports bulk clipboard clearing (default `true`).
    pub fn bulk_clear(mut self, enabled: bool) -> Self {
        self.bulk_clear = Some(enabled);
        self
    }

    /// Send requests through `transport` instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Apply every field of `config`.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.base_url = Some(config.base_url);
        if let Some(key) = config.api_key {
            self = self.api_key(key);
        }
        self.timeout = config.timeout;
        self.bulk_clear = Some(config.bulk_clear);
        self
    }

    /// Build the [`PluggedIn`] client.
    pub fn build(self) -> Result<PluggedIn, Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let url = self.base_url.as_deref().ok_or_else(|| {
                    Error::Config("base_url is required unless a transport is set".to_string())
                })?;
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(Error::Config(format!(
                        "base_url must start with http:// or https://, got '{}'",
                        url
                    )));
                }
                Arc::new(HttpTransport::new(url, self.auth, self.timeout)?)
            }
        };

        let clear_strategy = if self.bulk_clear.unwrap_or(true) {
            ClearStrategy::Bulk
        } else {
            ClearStrategy::Iterative
        };

        Ok(PluggedIn {
            transport,
            clear_strategy,
        })
    }
}
