//! # Plugged.in SDK
//!
//! Rust client for the [Plugged.in](https://plugged.in) API.
//!
//! - **[`Clipboard`]** - shared scratch space: named entries plus an indexed stack
//! - **[`Rag`]** - knowledge-base questions, tolerant of every answer shape the
//!   server has produced
//! - **[`Documents`]** / **[`Uploads`]** - document library passthroughs
//! - **[`Agents`]** - agent lifecycle, heartbeats and metrics
//! - **[`PluggedIn`]** - async facade; [`blocking::PluggedIn`] wraps it for
//!   synchronous callers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pluggedin_sdk::{PluggedIn, WriteOptions};
//!
//! # async fn example() -> pluggedin_sdk::Result<()> {
//! let client = PluggedIn::builder()
//!     .base_url("https://plugged.in")
//!     .api_key(std::env::var("PLUGGEDIN_API_KEY").unwrap_or_default())
//!     .build()?;
//!
//! let clipboard = client.clipboard();
//! clipboard.push("step 1 done", &WriteOptions::new()).await?;
//! if let Some(top) = clipboard.pop().await? {
//!     println!("popped {}", top.value);
//! }
//!
//! let cleared = clipboard.clear_all().await?;
//! println!("removed {} entries ({})", cleared.deleted, cleared.strategy);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  pluggedin-sdk (this crate)                   │
//! │  ┌───────────┐   ┌──────────────────────────┐ │
//! │  │ PluggedIn │──▶│ Clipboard  Rag  Documents│ │
//! │  │ (facade)  │   │ Uploads    Agents        │ │
//! │  └─────┬─────┘   └────────────┬─────────────┘ │
//! │        │ blocking::PluggedIn  │               │
//! │        ▼                      ▼               │
//! │  ┌─────────────────────────────────────────┐  │
//! │  │ dyn Transport                           │  │
//! │  │  HttpTransport (reqwest) │ Scripted...  │  │
//! │  └─────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────┘
//!                     │
//!                     ▼
//!              Plugged.in API
//! ```

pub mod agents;
pub mod auth;
pub mod blocking;
pub mod client;
pub mod clipboard;
pub mod config;
mod de;
pub mod documents;
pub mod error;
pub mod rag;
pub mod transport;
pub mod uploads;

// Flat re-exports for ergonomic use
pub use agents::{
    Agent, AgentDetails, AgentMetrics, AgentState, Agents, CreateAgentRequest, HeartbeatMode,
};
pub use auth::{ApiKeyAuth, AuthStrategy};
pub use client::{PluggedIn, PluggedInBuilder};
pub use clipboard::{
    Addressing, ClearAllResult, ClearStrategy, Clipboard, ClipboardEncoding, ClipboardEntry,
    ClipboardSource, ClipboardVisibility, WriteOptions,
};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use documents::{Document, DocumentFilters, Documents};
pub use error::Error;
pub use rag::{
    normalize_rag_response, Availability, QueryWithSources, Rag, RagResponse, RagSourceDocument,
    RagStorageStats,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ScriptedTransport, Transport};
pub use uploads::{UploadMetadata, Uploads};

/// Result type alias for Plugged.in SDK operations.
pub type Result<T> = std::result::Result<T, Error>;
