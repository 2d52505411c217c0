//! Interpretation of the `{success, entry | entries | deleted, error}`
//! envelope returned by clipboard endpoints.

use serde_json::Value;

use super::types::ClipboardEntry;
use crate::error::Error;
use crate::Result;

/// `success` must be literally `true`.
pub fn is_success(payload: &Value) -> bool {
    payload.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Entries from a list response. Fails unless the envelope reports success.
pub fn parse_list(payload: &Value) -> Result<Vec<ClipboardEntry>> {
    if !is_success(payload) {
        return Err(Error::service(payload, "Failed to list clipboard entries"));
    }
    match payload.get("entries") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(entries) => Ok(serde_json::from_value(entries.clone())?),
    }
}

/// Entry from a write response. A failed envelope or missing entry is an
/// error carrying the server message, or `default_message`.
pub fn parse_entry(payload: &Value, default_message: &str) -> Result<ClipboardEntry> {
    match entry_of(payload) {
        Some(entry) => Ok(serde_json::from_value(entry.clone())?),
        None => Err(Error::service(payload, default_message)),
    }
}

/// Entry from a read response. A failed envelope or missing entry means
/// "no such entry".
pub fn parse_optional_entry(payload: &Value) -> Result<Option<ClipboardEntry>> {
    entry_of(payload)
        .map(|entry| serde_json::from_value(entry.clone()))
        .transpose()
        .map_err(Error::from)
}

/// Number of entries a delete removed. Booleans count as 0/1; anything
/// unreadable, or a failed envelope, is 0.
pub fn parse_deleted(payload: &Value) -> u64 {
    if !is_success(payload) {
        return 0;
    }
    match payload.get("deleted") {
        Some(Value::Bool(deleted)) => u64::from(*deleted),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn entry_of(payload: &Value) -> Option<&Value> {
    if !is_success(payload) {
        return None;
    }
    payload.get("entry").filter(|entry| match entry {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}
