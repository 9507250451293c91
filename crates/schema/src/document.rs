//! The document model shared by the indexer, segment store, and scorer.

use serde::{Deserialize, Serialize};

/// A single source document headed for an index segment.
///
/// `key` is the document's unique identity (source URL or filesystem-relative
/// path) within a tenant's corpus; it must be non-empty and unique within a
/// segment. Everything else is free-form content the schema's field
/// descriptors decide whether to index, store, or both. `metadata` is passed
/// through to `fetch` responses but is never indexed or scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub key: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub headings_h1: Vec<String>,
    #[serde(default)]
    pub headings_h2: Vec<String>,
    #[serde(default)]
    pub headings_other: Vec<String>,
    #[serde(default)]
    pub code_blocks: Vec<String>,
    #[serde(default)]
    pub url_path_tokens: String,
    #[serde(default = "serde_json::Value::default")]
    pub metadata: serde_json::Value,
}

impl Document {
    /// Fetch the text content of one of this document's known fields, as a
    /// list of values (most fields have exactly one; heading/code fields may
    /// have many). Unknown field names yield an empty slice rather than an
    /// error — callers resolve field existence against the [`crate::Schema`]
    /// first.
    pub fn field_values(&self, field: &str) -> Vec<&str> {
        match field {
            "title" => vec![self.title.as_str()],
            "body" => vec![self.body.as_str()],
            "headings_h1" => self.headings_h1.iter().map(String::as_str).collect(),
            "headings_h2" => self.headings_h2.iter().map(String::as_str).collect(),
            "headings_other" => self.headings_other.iter().map(String::as_str).collect(),
            "code_blocks" => self.code_blocks.iter().map(String::as_str).collect(),
            "url_path_tokens" => vec![self.url_path_tokens.as_str()],
            _ => Vec::new(),
        }
    }
}
