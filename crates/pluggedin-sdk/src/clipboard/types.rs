//! Clipboard data model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::de::{lenient, null_as_default};
use crate::error::Error;
use crate::Result;

/// How an entry's `value` is encoded.
///
/// `utf8` is accepted as a spelling of `utf-8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipboardEncoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "hex")]
    Hex,
}

impl ClipboardEncoding {
    pub const ALL: [ClipboardEncoding; 3] = [Self::Utf8, Self::Base64, Self::Hex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }
}

impl fmt::Display for ClipboardEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipboardEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "utf8" {
            return Ok(Self::Utf8);
        }
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation(format!(
                    "unknown encoding '{}' (expected utf-8, base64 or hex)",
                    s
                ))
            })
    }
}

/// Who can see an entry.
///
/// `shared` is an older name for [`ClipboardVisibility::Workspace`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardVisibility {
    #[default]
    Private,
    #[serde(alias = "shared")]
    Workspace,
    Public,
}

impl ClipboardVisibility {
    pub const ALL: [ClipboardVisibility; 3] = [Self::Private, Self::Workspace, Self::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Workspace => "workspace",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for ClipboardVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipboardVisibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "shared" {
            return Ok(Self::Workspace);
        }
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation(format!(
                    "unknown visibility '{}' (expected private, workspace or public)",
                    s
                ))
            })
    }
}

/// Which surface wrote an entry. The SDK always writes [`ClipboardSource::Sdk`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardSource {
    #[default]
    Ui,
    Sdk,
    Mcp,
    /// Any writer tag this SDK does not know.
    #[serde(other)]
    Unknown,
}

impl ClipboardSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Sdk => "sdk",
            Self::Mcp => "mcp",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClipboardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clipboard entry as returned by the server.
///
/// Named entries carry `name`; stack entries carry `idx`. Attribute fields
/// that are `null` or hold a value this SDK does not recognise decode as
/// their defaults, so an entry is always readable if its shape is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub idx: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(
        default = "default_content_type",
        deserialize_with = "content_type_or_default"
    )]
    pub content_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub encoding: ClipboardEncoding,
    #[serde(default, deserialize_with = "lenient")]
    pub visibility: ClipboardVisibility,
    #[serde(default)]
    pub created_by_tool: Option<String>,
    #[serde(default)]
    pub created_by_model: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ClipboardSource,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

pub(crate) fn default_content_type() -> String {
    "text/plain".to_string()
}

fn content_type_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|content_type| !content_type.is_empty())
        .unwrap_or_else(default_content_type))
}

/// Exactly one way of pointing at an entry: by name or by stack index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    Name(String),
    Index(i64),
}

impl Addressing {
    /// Validate a `(name, idx)` pair from caller input.
    ///
    /// Exactly one must be given, and a name must be non-empty.
    pub fn new(name: Option<&str>, idx: Option<i64>) -> Result<Self> {
        match (name, idx) {
            (Some(_), Some(_)) => Err(Error::validation(
                "provide either name or idx, not both",
            )),
            (Some(""), None) => Err(Error::validation("name must not be empty")),
            (Some(name), None) => Ok(Addressing::Name(name.to_string())),
            (None, Some(idx)) => Ok(Addressing::Index(idx)),
            (None, None) => Err(Error::validation("either name or idx must be provided")),
        }
    }

    /// Address an existing entry, preferring its name over its index.
    pub fn of_entry(entry: &ClipboardEntry) -> Option<Self> {
        match (&entry.name, entry.idx) {
            (Some(name), _) if !name.is_empty() => Some(Addressing::Name(name.clone())),
            (_, Some(idx)) => Some(Addressing::Index(idx)),
            _ => None,
        }
    }
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addressing::Name(name) => write!(f, "name '{}'", name),
            Addressing::Index(idx) => write!(f, "idx {}", idx),
        }
    }
}

/// Optional attributes for `set` and `push`.
///
/// ```
/// use pluggedin_sdk::clipboard::{ClipboardVisibility, WriteOptions};
///
/// let options = WriteOptions::new()
///     .content_type("application/json")
///     .visibility(ClipboardVisibility::Workspace)
///     .ttl_seconds(3600);
/// assert_eq!(options.ttl_seconds, Some(3600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    pub content_type: String,
    pub encoding: ClipboardEncoding,
    pub visibility: ClipboardVisibility,
    pub created_by_tool: Option<String>,
    pub created_by_model: Option<String>,
    /// Must be positive when set.
    pub ttl_seconds: Option<i64>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            content_type: default_content_type(),
            encoding: ClipboardEncoding::default(),
            visibility: ClipboardVisibility::default(),
            created_by_tool: None,
            created_by_model: None,
            ttl_seconds: None,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn encoding(mut self, encoding: ClipboardEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Parse and set the encoding from its wire spelling.
    pub fn encoding_str(self, encoding: &str) -> Result<Self> {
        Ok(self.encoding(encoding.parse()?))
    }

    pub fn visibility(mut self, visibility: ClipboardVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Parse and set the visibility from its wire spelling.
    pub fn visibility_str(self, visibility: &str) -> Result<Self> {
        Ok(self.visibility(visibility.parse()?))
    }

    pub fn created_by_tool(mut self, tool: impl Into<String>) -> Self {
        self.created_by_tool = Some(tool.into());
        self
    }

    pub fn created_by_model(mut self, model: impl Into<String>) -> Self {
        self.created_by_model = Some(model.into());
        self
    }

    pub fn ttl_seconds(mut self, ttl: i64) -> Self {
        self.ttl_seconds = Some(ttl);
        self
    }
}

/// How `clear_all` removes entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearStrategy {
    /// One `DELETE {clearAll: true}` request.
    Bulk,
    /// List, then delete each entry in turn.
    Iterative,
}

impl fmt::Display for ClearStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClearStrategy::Bulk => "bulk",
            ClearStrategy::Iterative => "iterative",
        })
    }
}

/// Tally of a `clear_all` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClearAllResult {
    pub deleted: u64,
    pub failed: u64,
    pub strategy: ClearStrategy,
}

impl ClearAllResult {
    pub fn new(strategy: ClearStrategy) -> Self {
        Self {
            deleted: 0,
            failed: 0,
            strategy,
        }
    }

    pub fn total(&self) -> u64 {
        self.deleted + self.failed
    }

    /// True when nothing failed.
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}
