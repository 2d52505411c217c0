//! Knowledge-base (RAG) queries.
//!
//! The query endpoint is loosely specified: depending on server version it
//! answers with plain text or a JSON object whose answer may live under one
//! of several keys. [`normalize_rag_response`] folds every shape into a
//! single [`RagResponse`]; the higher-level operations are thin wrappers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::Error;
use crate::transport::{ApiRequest, Transport};
use crate::Result;

const QUERY_PATH: &str = "/api/rag/query";
const STORAGE_STATS_PATH: &str = "/api/rag/storage-stats";

/// Keys that may carry the answer text, in priority order.
pub const ANSWER_ALIASES: &[&str] = &["answer", "response", "results", "message"];

/// Keys that may carry the source document ids, in priority order.
pub const DOCUMENT_ID_ALIASES: &[&str] = &["documentIds", "document_ids"];

/// Query sent by [`Rag::check_availability`].
pub const HEALTH_CHECK_QUERY: &str = "__pluggedin_health_check__";

const UNEXPECTED_FORMAT: &str = "Unexpected response format from RAG query endpoint";
const NO_ANSWER: &str = "No answer received from knowledge base";

/// A document that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagSourceDocument {
    pub id: String,
    pub name: String,
}

/// Normalised result of a knowledge-base query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RagResponse {
    pub success: bool,
    pub answer: Option<String>,
    pub sources: Vec<String>,
    pub document_ids: Vec<String>,
    /// `document_ids` paired positionally with `sources`.
    pub documents: Vec<RagSourceDocument>,
    pub error: Option<String>,
}

/// Answer plus the documents it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryWithSources {
    pub answer: String,
    pub sources: Vec<RagSourceDocument>,
}

/// Outcome of a knowledge-base health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Per-user storage usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagStorageStats {
    #[serde(default)]
    pub documents_count: u64,
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub estimated_storage_mb: f64,
    #[serde(default)]
    pub vectors_count: Option<u64>,
    #[serde(default)]
    pub embedding_dimension: Option<u32>,
    #[serde(default = "default_true")]
    pub is_estimate: bool,
}

fn default_true() -> bool {
    true
}

/// Fold any query-endpoint payload into a [`RagResponse`].
///
/// - a JSON string is a successful plain-text answer
/// - an object is read through [`ANSWER_ALIASES`] and [`DOCUMENT_ID_ALIASES`]
/// - anything else is reported as an unexpected format
///
/// ```
/// use pluggedin_sdk::rag::normalize_rag_response;
/// use serde_json::json;
///
/// let response = normalize_rag_response(&json!({
///     "response": "Paris",
///     "sources": ["geo.md"],
///     "documentIds": ["d1", "d2"],
/// }));
/// assert_eq!(response.answer.as_deref(), Some("Paris"));
/// assert_eq!(response.documents[0].name, "geo.md");
/// assert_eq!(response.documents[1].name, "Document 2");
/// ```
pub fn normalize_rag_response(raw: &Value) -> RagResponse {
    match raw {
        Value::String(text) => RagResponse {
            success: true,
            answer: Some(text.clone()),
            ..Default::default()
        },
        Value::Object(map) => normalize_object(map),
        _ => RagResponse {
            success: false,
            error: Some(UNEXPECTED_FORMAT.to_string()),
            ..Default::default()
        },
    }
}

fn normalize_object(map: &Map<String, Value>) -> RagResponse {
    let answer = ANSWER_ALIASES
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string();

    let sources = string_list(map.get("sources"));
    let document_ids = DOCUMENT_ID_ALIASES
        .iter()
        .map(|key| string_list(map.get(*key)))
        .find(|ids| !ids.is_empty())
        .unwrap_or_default();
    let documents = pair_documents(&document_ids, &sources);

    RagResponse {
        success: map.get("success").and_then(Value::as_bool).unwrap_or(true),
        answer: Some(answer),
        sources,
        document_ids,
        documents,
        error: map.get("error").and_then(error_text),
    }
}

// Structured errors are kept as their JSON text.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Pair ids with source names by position; missing names become
/// `"Document {n}"` (1-based).
pub fn pair_documents(ids: &[String], sources: &[String]) -> Vec<RagSourceDocument> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| RagSourceDocument {
            id: id.clone(),
            name: sources
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("Document {}", i + 1)),
        })
        .collect()
}

// Non-string items keep their slot as JSON text so positions still line up.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Knowledge-base operations bound to a transport.
#[derive(Clone)]
pub struct Rag {
    transport: Arc<dyn Transport>,
}

impl Rag {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Ask the knowledge base a question.
    ///
    /// A server-reported failure is returned inside the response
    /// (`success == false`), not as an `Err`.
    pub async fn query(&self, query: &str, include_metadata: bool) -> Result<RagResponse> {
        let request = ApiRequest::post(QUERY_PATH).with_json(json!({
            "query": query,
            "includeMetadata": include_metadata,
        }));
        let payload = self.transport.send(request).await?.into_payload(true)?;
        Ok(normalize_rag_response(&payload))
    }

    /// Answer text only.
    pub async fn ask_question(&self, query: &str) -> Result<String> {
        let response = self.query(query, false).await?;
        let (answer, _) = require_answer(response)?;
        Ok(answer)
    }

    /// Answer text plus the source documents.
    pub async fn query_with_sources(&self, query: &str) -> Result<QueryWithSources> {
        let response = self.query(query, true).await?;
        let (answer, sources) = require_answer(response)?;
        Ok(QueryWithSources { answer, sources })
    }

    /// Up to `limit` documents relevant to `query`.
    pub async fn find_relevant_documents(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RagSourceDocument>> {
        let response = self.query(query, true).await?;
        if !response.success {
            return Err(Error::Service(
                response
                    .error
                    .unwrap_or_else(|| "Failed to search documents".to_string()),
            ));
        }
        let mut documents = response.documents;
        documents.truncate(limit);
        Ok(documents)
    }

    /// Probe the knowledge base. Never fails: a transport or HTTP error is
    /// reported as `available: false` with its message.
    pub async fn check_availability(&self) -> Availability {
        match self.query(HEALTH_CHECK_QUERY, false).await {
            Ok(_) => Availability {
                available: true,
                message: None,
            },
            Err(e) => {
                warn!(error = %e, "knowledge base unavailable");
                Availability {
                    available: false,
                    message: Some(e.to_string()),
                }
            }
        }
    }

    /// Storage usage for `user_id`. Missing fields take documented defaults.
    pub async fn get_storage_stats(&self, user_id: &str) -> Result<RagStorageStats> {
        if user_id.is_empty() {
            return Err(Error::validation(
                "user_id is required to fetch storage statistics",
            ));
        }
        let request = ApiRequest::get(STORAGE_STATS_PATH).with_query("user_id", user_id);
        let payload = self.transport.send(request).await?.into_payload(false)?;
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(Error::service(&payload, "Failed to fetch storage statistics"));
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Withdrawn from the public API; always fails without a request.
    pub fn refresh_document(&self, _document_id: &str) -> Result<()> {
        Err(Error::Removed(
            "Document refresh is no longer available via the public API.",
        ))
    }

    /// Withdrawn from the public API; always fails without a request.
    pub fn remove_document(&self, _document_id: &str) -> Result<()> {
        Err(Error::Removed(
            "Document removal is no longer available via the public API.",
        ))
    }
}

fn require_answer(response: RagResponse) -> Result<(String, Vec<RagSourceDocument>)> {
    match response.answer {
        Some(answer) if response.success && !answer.is_empty() => Ok((answer, response.documents)),
        _ => Err(Error::Service(
            response.error.unwrap_or_else(|| NO_ANSWER.to_string()),
        )),
    }
}
