//! Document uploads.
//!
//! Only text documents created through the AI endpoint are still accepted;
//! the binary, batch and tracking flows were withdrawn server-side and fail
//! locally with [`Error::Removed`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::documents::{Document, Documents};
use crate::error::Error;
use crate::transport::{ApiRequest, Transport};
use crate::Result;

const AI_DOCUMENT_PATH: &str = "/api/documents/ai";
const DEFAULT_FORMAT: &str = "md";

const UPLOAD_FILE_REMOVED: &str = "Binary file uploads are no longer supported via the API. \
     Please use the Plugged.in web interface or forthcoming upload workflow.";
const UPLOAD_BATCH_REMOVED: &str = "Batch uploads are no longer supported via the API.";
const TRACKING_REMOVED: &str = "Upload status tracking is no longer available via the API.";

/// Describes a document being uploaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Content format; `md` when unset.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl UploadMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Upload operations bound to a transport.
#[derive(Clone)]
pub struct Uploads {
    transport: Arc<dyn Transport>,
    documents: Documents,
}

impl Uploads {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            documents: Documents::new(transport.clone()),
            transport,
        }
    }

    /// Create a text document and return it with its content.
    pub async fn upload_document(
        &self,
        content: &str,
        metadata: &UploadMetadata,
    ) -> Result<Document> {
        if metadata.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }

        let body = json!({
            "title": metadata.title,
            "content": content,
            "description": metadata.description,
            "tags": metadata.tags,
            "category": metadata.category,
            "format": metadata.format.as_deref().unwrap_or(DEFAULT_FORMAT),
            "metadata": metadata.metadata,
        });
        let request = ApiRequest::post(AI_DOCUMENT_PATH).with_json(body);
        let payload = self.transport.send(request).await?.into_payload(false)?;

        if payload.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(Error::service(&payload, "Failed to upload document"));
        }
        let document_id = payload
            .get("documentId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Service("Server did not return a document id".to_string()))?;

        self.documents.get(document_id, true).await
    }

    pub fn upload_file(&self, _path: &std::path::Path, _metadata: &UploadMetadata) -> Result<()> {
        Err(Error::Removed(UPLOAD_FILE_REMOVED))
    }

    pub fn upload_batch(&self, _files: &[UploadMetadata]) -> Result<()> {
        Err(Error::Removed(UPLOAD_BATCH_REMOVED))
    }

    pub fn check_upload_status(&self, _upload_id: &str) -> Result<()> {
        Err(Error::Removed(TRACKING_REMOVED))
    }

    pub fn track_upload(&self, _upload_id: &str) -> Result<()> {
        Err(Error::Removed(TRACKING_REMOVED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Method, ScriptedTransport};

    fn uploads() -> (Arc<ScriptedTransport>, Uploads) {
        let transport = Arc::new(ScriptedTransport::new());
        (transport.clone(), Uploads::new(transport))
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let (transport, uploads) = uploads();
        transport
            .push_json(200, json!({"success": true, "documentId": "doc-9"}))
            .push_json(200, json!({"id": "doc-9", "title": "Report", "content": "# Hi"}));

        let metadata = UploadMetadata {
            tags: vec!["weekly".into()],
            ..UploadMetadata::new("Report")
        };
        let doc = uploads.upload_document("# Hi", &metadata).await.unwrap();
        assert_eq!(doc.id, "doc-9");
        assert_eq!(doc.content.as_deref(), Some("# Hi"));

        let sent = transport.requests();
        assert_eq!(sent[0].path, "/api/documents/ai");
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["format"], "md");
        assert_eq!(body["tags"], json!(["weekly"]));
        assert_eq!(body["description"], Value::Null);

        assert_eq!(sent[1].method, Method::Get);
        assert_eq!(sent[1].path, "/api/documents/doc-9");
        assert_eq!(sent[1].query_value("includeContent"), Some("true"));
    }

    #[tokio::test]
    async fn test_upload_failures() {
        let (transport, uploads) = uploads();
        transport
            .push_json(200, json!({"success": false, "error": "Storage quota exceeded"}))
            .push_json(200, json!({"success": true}));

        let metadata = UploadMetadata::new("x");
        let err = uploads.upload_document("c", &metadata).await.unwrap_err();
        assert_eq!(err.to_string(), "Storage quota exceeded");

        let err = uploads.upload_document("c", &metadata).await.unwrap_err();
        assert_eq!(err.to_string(), "Server did not return a document id");
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_withdrawn_operations_fail_locally() {
        let (transport, uploads) = uploads();
        let metadata = UploadMetadata::new("x");

        let err = uploads
            .upload_file(std::path::Path::new("a.pdf"), &metadata)
            .unwrap_err();
        assert!(err.to_string().starts_with("Binary file uploads are no longer supported"));
        assert!(matches!(uploads.upload_batch(&[]), Err(Error::Removed(_))));
        assert!(matches!(uploads.check_upload_status("u"), Err(Error::Removed(_))));
        assert!(matches!(uploads.track_upload("u"), Err(Error::Removed(_))));
        assert!(transport.requests().is_empty());
    }
}
