//! Clipboard service: named entries plus an indexed stack.
//!
//! | Operation   | Endpoint                         |
//! |-------------|----------------------------------|
//! | `list`      | `GET /api/clipboard`             |
//! | `get`       | `GET /api/clipboard?name=|idx=`  |
//! | `set`       | `POST /api/clipboard`            |
//! | `push`      | `POST /api/clipboard/push`       |
//! | `pop`       | `POST /api/clipboard/pop`        |
//! | `delete`    | `DELETE /api/clipboard`          |
//! | `clear_all` | `DELETE /api/clipboard` (bulk) or list + delete |

pub mod envelope;
pub mod payload;
mod types;

use std::sync::Arc;

use tracing::{info, warn};

pub use types::{
    Addressing, ClearAllResult, ClearStrategy, ClipboardEncoding, ClipboardEntry,
    ClipboardSource, ClipboardVisibility, WriteOptions,
};

use crate::error::Error;
use crate::transport::{ApiRequest, Transport};
use crate::Result;

const CLIPBOARD_PATH: &str = "/api/clipboard";
const PUSH_PATH: &str = "/api/clipboard/push";
const POP_PATH: &str = "/api/clipboard/pop";

/// Clipboard operations bound to a transport.
///
/// Obtained from [`PluggedIn::clipboard`](crate::PluggedIn::clipboard).
#[derive(Clone)]
pub struct Clipboard {
    transport: Arc<dyn Transport>,
    strategy: ClearStrategy,
}

impl Clipboard {
    pub(crate) fn new(transport: Arc<dyn Transport>, strategy: ClearStrategy) -> Self {
        Self {
            transport,
            strategy,
        }
    }

    /// Strategy [`clear_all`](Self::clear_all) uses.
    pub fn clear_strategy(&self) -> ClearStrategy {
        self.strategy
    }

    /// All entries visible to the caller.
    pub async fn list(&self) -> Result<Vec<ClipboardEntry>> {
        let payload = self.call(ApiRequest::get(CLIPBOARD_PATH)).await?;
        envelope::parse_list(&payload)
    }

    /// Look up one entry by name or stack index. `None` when absent.
    pub async fn get(
        &self,
        name: Option<&str>,
        idx: Option<i64>,
    ) -> Result<Option<ClipboardEntry>> {
        let addressing = Addressing::new(name, idx)?;
        self.get_at(&addressing).await
    }

    /// Like [`get`](Self::get) with pre-validated addressing.
    pub async fn get_at(&self, addressing: &Addressing) -> Result<Option<ClipboardEntry>> {
        let (key, value) = payload::lookup_params(addressing);
        let request = ApiRequest::get(CLIPBOARD_PATH).with_query(key, value);
        let payload = self.call(request).await?;
        envelope::parse_optional_entry(&payload)
    }

    /// Create or replace the entry called `name`.
    pub async fn set(
        &self,
        name: &str,
        value: &str,
        options: &WriteOptions,
    ) -> Result<ClipboardEntry> {
        if name.is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        let body = payload::write_payload(value, Some(name), options)?;
        let payload = self.call(ApiRequest::post(CLIPBOARD_PATH).with_json(body)).await?;
        envelope::parse_entry(&payload, "Failed to set clipboard entry")
    }

    /// Push an unnamed entry onto the stack.
    pub async fn push(&self, value: &str, options: &WriteOptions) -> Result<ClipboardEntry> {
        let body = payload::write_payload(value, None, options)?;
        let payload = self.call(ApiRequest::post(PUSH_PATH).with_json(body)).await?;
        envelope::parse_entry(&payload, "Failed to push to clipboard")
    }

    /// Remove and return the top of the stack. `None` when empty.
    pub async fn pop(&self) -> Result<Option<ClipboardEntry>> {
        let payload = self.call(ApiRequest::post(POP_PATH)).await?;
        envelope::parse_optional_entry(&payload)
    }

    /// Delete one entry; returns how many were removed (0 when none matched).
    pub async fn delete(&self, name: Option<&str>, idx: Option<i64>) -> Result<u64> {
        let addressing = Addressing::new(name, idx)?;
        self.delete_at(&addressing).await
    }

    /// Like [`delete`](Self::delete) with pre-validated addressing.
    pub async fn delete_at(&self, addressing: &Addressing) -> Result<u64> {
        let request =
            ApiRequest::delete(CLIPBOARD_PATH).with_json(payload::delete_payload(addressing));
        let payload = self.call(request).await?;
        Ok(envelope::parse_deleted(&payload))
    }

    /// Remove every entry using the configured [`ClearStrategy`].
    pub async fn clear_all(&self) -> Result<ClearAllResult> {
        self.clear_all_with(self.strategy).await
    }

    /// Remove every entry using an explicit strategy.
    ///
    /// The iterative strategy keeps going past individual failures; each
    /// one is logged and counted in [`ClearAllResult::failed`].
    pub async fn clear_all_with(&self, strategy: ClearStrategy) -> Result<ClearAllResult> {
        info!(%strategy, "clearing clipboard");
        match strategy {
            ClearStrategy::Bulk => self.clear_bulk().await,
            ClearStrategy::Iterative => self.clear_iterative().await,
        }
    }

    async fn clear_bulk(&self) -> Result<ClearAllResult> {
        let request = ApiRequest::delete(CLIPBOARD_PATH).with_json(payload::clear_all_payload());
        let payload = self.call(request).await?;
        if !envelope::is_success(&payload) {
            return Err(Error::service(&payload, "Failed to clear clipboard"));
        }
        Ok(ClearAllResult {
            deleted: envelope::parse_deleted(&payload),
            failed: 0,
            strategy: ClearStrategy::Bulk,
        })
    }

    async fn clear_iterative(&self) -> Result<ClearAllResult> {
        let entries = self.list().await?;
        let mut result = ClearAllResult::new(ClearStrategy::Iterative);

        for entry in &entries {
            let Some(addressing) = Addressing::of_entry(entry) else {
                warn!(uuid = ?entry.uuid, "clipboard entry has neither name nor idx");
                result.failed += 1;
                continue;
            };

            match self.delete_at(&addressing).await {
                Ok(removed) if removed > 0 => result.deleted += 1,
                Ok(_) => {
                    warn!(%addressing, "clipboard entry was not deleted");
                    result.failed += 1;
                }
                Err(e) => {
                    warn!(%addressing, error = %e, "failed to delete clipboard entry");
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }

    async fn call(&self, request: ApiRequest) -> Result<serde_json::Value> {
        self.transport.send(request).await?.into_payload(false)
    }
}
