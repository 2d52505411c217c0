//! Document library passthrough.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::de::null_as_default;
use crate::error::Error;
use crate::transport::{path_segment, ApiRequest, Transport};
use crate::Result;

const DOCUMENTS_PATH: &str = "/api/documents";
const SEARCH_PATH: &str = "/api/documents/search";

/// A document in the caller's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Present only when fetched with content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Server fields this SDK does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of [`Documents::list`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Filters for [`Documents::list`]. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilters {
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub search_query: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub model_provider: Option<String>,
    pub model_name: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DocumentFilters {
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                params.push((key.to_string(), value));
            }
        };
        put("source", self.source.clone());
        put(
            "tags",
            (!self.tags.is_empty()).then(|| self.tags.join(",")),
        );
        put("category", self.category.clone());
        put("searchQuery", self.search_query.clone());
        put("dateFrom", self.date_from.clone());
        put("dateTo", self.date_to.clone());
        put("modelProvider", self.model_provider.clone());
        put("modelName", self.model_name.clone());
        put("sort", self.sort.clone());
        put("limit", self.limit.map(|n| n.to_string()));
        put("offset", self.offset.map(|n| n.to_string()));
        params
    }
}

/// Options for [`Documents::search`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total: u64,
}

/// How an update combines with existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOperation {
    Replace,
    Append,
    Prepend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateDocumentRequest {
    pub operation: UpdateOperation,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Document operations bound to a transport.
#[derive(Clone)]
pub struct Documents {
    transport: Arc<dyn Transport>,
}

impl Documents {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, filters: &DocumentFilters) -> Result<DocumentList> {
        let mut request = ApiRequest::get(DOCUMENTS_PATH);
        request.query = filters.query_params();
        let payload = self.call(request, "Failed to list documents").await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn get(&self, document_id: &str, include_content: bool) -> Result<Document> {
        let id = path_segment("document_id", document_id)?;
        let mut request = ApiRequest::get(format!("{}/{}", DOCUMENTS_PATH, id));
        if include_content {
            request = request.with_query("includeContent", "true");
        }
        let payload = self.call(request, "Failed to fetch document").await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let mut body = serde_json::to_value(options)?;
        body["query"] = json!(query);
        let request = ApiRequest::post(SEARCH_PATH).with_json(body);
        let payload = self.call(request, "Failed to search documents").await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Returns the server's acknowledgement as-is.
    pub async fn update(&self, document_id: &str, update: &UpdateDocumentRequest) -> Result<Value> {
        let id = path_segment("document_id", document_id)?;
        let request = ApiRequest::patch(format!("{}/{}", DOCUMENTS_PATH, id))
            .with_json(serde_json::to_value(update)?);
        self.call(request, "Failed to update document").await
    }

    pub async fn delete(&self, document_id: &str) -> Result<()> {
        let id = path_segment("document_id", document_id)?;
        let request = ApiRequest::delete(format!("{}/{}", DOCUMENTS_PATH, id));
        self.call(request, "Failed to delete document").await?;
        Ok(())
    }

    // A `success: false` envelope is a service error here; there is no
    // "absent" result for these endpoints.
    async fn call(&self, request: ApiRequest, default_message: &str) -> Result<Value> {
        let payload = self.transport.send(request).await?.into_payload(false)?;
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(Error::service(&payload, default_message));
        }
        Ok(payload)
    }
}
