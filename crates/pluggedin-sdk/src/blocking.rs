//! Blocking facade.
//!
//! Owns a current-thread Tokio runtime and drives the async services with
//! `block_on`, so both facades share one implementation. Must not be used
//! from inside an async context.
//!
//! ```rust,no_run
//! use pluggedin_sdk::blocking::PluggedIn;
//!
//! # fn main() -> pluggedin_sdk::Result<()> {
//! let client = PluggedIn::from_env()?;
//! for entry in client.clipboard().list()? {
//!     println!("{:?} = {}", entry.name, entry.value);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde_json::Value;
use tokio::runtime::Runtime;

use crate::agents::{Agent, AgentDetails, AgentMetrics, CreateAgentRequest, HeartbeatMode};
use crate::clipboard::{Addressing, ClearAllResult, ClearStrategy, ClipboardEntry, WriteOptions};
use crate::config::ClientConfig;
use crate::documents::{
    Document, DocumentFilters, DocumentList, SearchOptions, SearchResponse, UpdateDocumentRequest,
};
use crate::rag::{Availability, QueryWithSources, RagResponse, RagSourceDocument, RagStorageStats};
use crate::uploads::UploadMetadata;
use crate::{Error, Result};

/// Blocking Plugged.in client.
pub struct PluggedIn {
    runtime: Runtime,
    inner: crate::PluggedIn,
}

impl PluggedIn {
    /// Wrap an async client.
    pub fn new(inner: crate::PluggedIn) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("failed to start runtime: {}", e)))?;
        Ok(Self { runtime, inner })
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::new(crate::PluggedIn::from_config(config)?)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn clipboard(&self) -> Clipboard<'_> {
        Clipboard {
            runtime: &self.runtime,
            inner: self.inner.clipboard(),
        }
    }

    pub fn rag(&self) -> Rag<'_> {
        Rag {
            runtime: &self.runtime,
            inner: self.inner.rag(),
        }
    }

    pub fn documents(&self) -> Documents<'_> {
        Documents {
            runtime: &self.runtime,
            inner: self.inner.documents(),
        }
    }

    pub fn uploads(&self) -> Uploads<'_> {
        Uploads {
            runtime: &self.runtime,
            inner: self.inner.uploads(),
        }
    }

    pub fn agents(&self) -> Agents<'_> {
        Agents {
            runtime: &self.runtime,
            inner: self.inner.agents(),
        }
    }

    /// The async client this facade drives.
    pub fn as_async(&self) -> &crate::PluggedIn {
        &self.inner
    }
}

// -- Clipboard --

pub struct Clipboard<'a> {
    runtime: &'a Runtime,
    inner: crate::clipboard::Clipboard,
}

impl Clipboard<'_> {
    pub fn clear_strategy(&self) -> ClearStrategy {
        self.inner.clear_strategy()
    }

    pub fn list(&self) -> Result<Vec<ClipboardEntry>> {
        self.runtime.block_on(self.inner.list())
    }

    pub fn get(&self, name: Option<&str>, idx: Option<i64>) -> Result<Option<ClipboardEntry>> {
        self.runtime.block_on(self.inner.get(name, idx))
    }

    pub fn get_at(&self, addressing: &Addressing) -> Result<Option<ClipboardEntry>> {
        self.runtime.block_on(self.inner.get_at(addressing))
    }

    pub fn set(&self, name: &str, value: &str, options: &WriteOptions) -> Result<ClipboardEntry> {
        self.runtime.block_on(self.inner.set(name, value, options))
    }

    pub fn push(&self, value: &str, options: &WriteOptions) -> Result<ClipboardEntry> {
        self.runtime.block_on(self.inner.push(value, options))
    }

    pub fn pop(&self) -> Result<Option<ClipboardEntry>> {
        self.runtime.block_on(self.inner.pop())
    }

    pub fn delete(&self, name: Option<&str>, idx: Option<i64>) -> Result<u64> {
        self.runtime.block_on(self.inner.delete(name, idx))
    }

    pub fn delete_at(&self, addressing: &Addressing) -> Result<u64> {
        self.runtime.block_on(self.inner.delete_at(addressing))
    }

    pub fn clear_all(&self) -> Result<ClearAllResult> {
        self.runtime.block_on(self.inner.clear_all())
    }

    pub fn clear_all_with(&self, strategy: ClearStrategy) -> Result<ClearAllResult> {
        self.runtime.block_on(self.inner.clear_all_with(strategy))
    }
}

// -- RAG --

pub struct Rag<'a> {
    runtime: &'a Runtime,
    inner: crate::rag::Rag,
}

impl Rag<'_> {
    pub fn query(&self, query: &str, include_metadata: bool) -> Result<RagResponse> {
        self.runtime.block_on(self.inner.query(query, include_metadata))
    }

    pub fn ask_question(&self, query: &str) -> Result<String> {
        self.runtime.block_on(self.inner.ask_question(query))
    }

    pub fn query_with_sources(&self, query: &str) -> Result<QueryWithSources> {
        self.runtime.block_on(self.inner.query_with_sources(query))
    }

    pub fn find_relevant_documents(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RagSourceDocument>> {
        self.runtime
            .block_on(self.inner.find_relevant_documents(query, limit))
    }

    pub fn check_availability(&self) -> Availability {
        self.runtime.block_on(self.inner.check_availability())
    }

    pub fn get_storage_stats(&self, user_id: &str) -> Result<RagStorageStats> {
        self.runtime.block_on(self.inner.get_storage_stats(user_id))
    }

    pub fn refresh_document(&self, document_id: &str) -> Result<()> {
        self.inner.refresh_document(document_id)
    }

    pub fn remove_document(&self, document_id: &str) -> Result<()> {
        self.inner.remove_document(document_id)
    }
}

// -- Documents --

pub struct Documents<'a> {
    runtime: &'a Runtime,
    inner: crate::documents::Documents,
}

impl Documents<'_> {
    pub fn list(&self, filters: &DocumentFilters) -> Result<DocumentList> {
        self.runtime.block_on(self.inner.list(filters))
    }

    pub fn get(&self, document_id: &str, include_content: bool) -> Result<Document> {
        self.runtime
            .block_on(self.inner.get(document_id, include_content))
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        self.runtime.block_on(self.inner.search(query, options))
    }

    pub fn update(&self, document_id: &str, update: &UpdateDocumentRequest) -> Result<Value> {
        self.runtime.block_on(self.inner.update(document_id, update))
    }

    pub fn delete(&self, document_id: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete(document_id))
    }
}

// -- Uploads --

pub struct Uploads<'a> {
    runtime: &'a Runtime,
    inner: crate::uploads::Uploads,
}

impl Uploads<'_> {
    pub fn upload_document(&self, content: &str, metadata: &UploadMetadata) -> Result<Document> {
        self.runtime
            .block_on(self.inner.upload_document(content, metadata))
    }

    pub fn upload_file(&self, path: &Path, metadata: &UploadMetadata) -> Result<()> {
        self.inner.upload_file(path, metadata)
    }

    pub fn upload_batch(&self, files: &[UploadMetadata]) -> Result<()> {
        self.inner.upload_batch(files)
    }

    pub fn check_upload_status(&self, upload_id: &str) -> Result<()> {
        self.inner.check_upload_status(upload_id)
    }

    pub fn track_upload(&self, upload_id: &str) -> Result<()> {
        self.inner.track_upload(upload_id)
    }
}

// -- Agents --

pub struct Agents<'a> {
    runtime: &'a Runtime,
    inner: crate::agents::Agents,
}

impl Agents<'_> {
    pub fn list(&self) -> Result<Vec<Agent>> {
        self.runtime.block_on(self.inner.list())
    }

    pub fn create(&self, request: &CreateAgentRequest) -> Result<Value> {
        self.runtime.block_on(self.inner.create(request))
    }

    pub fn get(&self, agent_id: &str) -> Result<AgentDetails> {
        self.runtime.block_on(self.inner.get(agent_id))
    }

    pub fn delete(&self, agent_id: &str) -> Result<Value> {
        self.runtime.block_on(self.inner.delete(agent_id))
    }

    pub fn export(
        &self,
        agent_id: &str,
        include_telemetry: bool,
        telemetry_limit: u32,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.inner.export(agent_id, include_telemetry, telemetry_limit))
    }

    pub fn heartbeat(
        &self,
        agent_id: &str,
        mode: HeartbeatMode,
        uptime_seconds: f64,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.inner.heartbeat(agent_id, mode, uptime_seconds))
    }

    pub fn metrics(&self, agent_id: &str, metrics: &AgentMetrics) -> Result<Value> {
        self.runtime.block_on(self.inner.metrics(agent_id, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: &Arc<ScriptedTransport>) -> PluggedIn {
        let inner = crate::PluggedIn::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        PluggedIn::new(inner).unwrap()
    }

    #[test]
    fn test_blocking_clipboard_round_trip() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_json(200, json!({"success": true, "entry": {"name": "k", "value": "v"}}))
            .push_json(200, json!({"success": true, "entry": {"name": "k", "value": "v"}}));

        let client = client(&transport);
        let stored = client.clipboard().set("k", "v", &WriteOptions::new()).unwrap();
        let fetched = client.clipboard().get(Some("k"), None).unwrap();
        assert_eq!(Some(stored), fetched);
    }

    #[test]
    fn test_blocking_validation_matches_async() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = client(&transport);

        assert!(client.clipboard().get(None, None).unwrap_err().is_validation());
        assert!(client.rag().get_storage_stats("").unwrap_err().is_validation());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_blocking_rag() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_text(200, "forty-two");

        let client = client(&transport);
        assert_eq!(client.rag().ask_question("meaning?").unwrap(), "forty-two");
    }
}
