//! Request bodies and query parameters for clipboard endpoints.

use serde::Serialize;
use serde_json::{json, Value};

use super::types::{
    Addressing, ClipboardEncoding, ClipboardSource, ClipboardVisibility, WriteOptions,
};
use crate::error::Error;
use crate::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WritePayload<'a> {
    value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    content_type: &'a str,
    encoding: ClipboardEncoding,
    visibility: ClipboardVisibility,
    source: ClipboardSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by_tool: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by_model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl_seconds: Option<i64>,
}

/// Build the body for `set` (with a name) or `push` (without).
///
/// Optional attributes are omitted rather than sent as `null`, and
/// `source` is always `"sdk"`.
///
/// ```
/// use pluggedin_sdk::clipboard::{payload::write_payload, WriteOptions};
///
/// let body = write_payload("hi", Some("greeting"), &WriteOptions::new()).unwrap();
/// assert_eq!(body["source"], "sdk");
/// assert!(body.get("ttlSeconds").is_none());
/// ```
pub fn write_payload(value: &str, name: Option<&str>, options: &WriteOptions) -> Result<Value> {
    if matches!(options.ttl_seconds, Some(ttl) if ttl <= 0) {
        return Err(Error::validation(
            "ttl_seconds must be greater than 0 when provided",
        ));
    }

    let payload = WritePayload {
        value,
        name: name.filter(|n| !n.is_empty()),
        content_type: &options.content_type,
        encoding: options.encoding,
        visibility: options.visibility,
        source: ClipboardSource::Sdk,
        created_by_tool: options.created_by_tool.as_deref().filter(|s| !s.is_empty()),
        created_by_model: options.created_by_model.as_deref().filter(|s| !s.is_empty()),
        ttl_seconds: options.ttl_seconds,
    };
    Ok(serde_json::to_value(payload)?)
}

/// Query parameters for `GET /api/clipboard`.
pub fn lookup_params(addressing: &Addressing) -> (&'static str, String) {
    match addressing {
        Addressing::Name(name) => ("name", name.clone()),
        Addressing::Index(idx) => ("idx", idx.to_string()),
    }
}

/// Body for `DELETE /api/clipboard` targeting one entry.
pub fn delete_payload(addressing: &Addressing) -> Value {
    match addressing {
        Addressing::Name(name) => json!({ "name": name }),
        Addressing::Index(idx) => json!({ "idx": idx }),
    }
}

/// Body for the single-request bulk clear.
pub fn clear_all_payload() -> Value {
    json!({ "clearAll": true })
}
