//! Field schema: the ordered list of field descriptors a segment is built
//! and queried against.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::AnalyzerProfileKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema must declare exactly one unique-key field, found {0}")]
    KeyFieldCount(usize),
    #[error("field name must be non-empty")]
    EmptyFieldName,
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Tokenized, positional, indexed for full-text search.
    Text,
    /// Indexed as a single opaque token (no analysis); used for the unique key.
    Keyword,
    /// Passed through to `fetch` but never indexed.
    Stored,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub indexed: bool,
    pub stored: bool,
    pub boost: f32,
    pub analyzer_profile: AnalyzerProfileKind,
    /// True for the single field that carries the document's unique key.
    pub is_unique_key: bool,
}

impl FieldDescriptor {
    fn text(name: &str, boost: f32, analyzer: AnalyzerProfileKind, stored: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
            indexed: true,
            stored,
            boost,
            analyzer_profile: analyzer,
            is_unique_key: false,
        }
    }
}

/// An ordered list of field descriptors plus the index of the unique-key field.
///
/// Field order determines the stable `field_id` (`u16`) used inside segment
/// posting keys — appending fields is backward compatible, reordering or
/// removing them is not (a schema change invalidates existing segments, which
/// is why a schema mismatch surfaces as `IndexCorrupt` on open).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        let mut key_count = 0usize;
        for f in &fields {
            if f.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(f.name.as_str()) {
                return Err(SchemaError::DuplicateField(f.name.clone()));
            }
            if f.is_unique_key {
                key_count += 1;
            }
        }
        if key_count != 1 {
            return Err(SchemaError::KeyFieldCount(key_count));
        }
        Ok(Self { fields })
    }

    /// The default documentation schema: `key`, `title`, `body`, the three
    /// heading tiers, `code_blocks`, and `url_path_tokens`, with the field
    /// boosts from spec §4.2 baked in as structural defaults (a tenant's
    /// search config may still override them at query time).
    pub fn documentation_default() -> Self {
        let fields = vec![
            FieldDescriptor {
                name: "key".to_string(),
                kind: FieldKind::Keyword,
                indexed: false,
                stored: true,
                boost: 1.0,
                analyzer_profile: AnalyzerProfileKind::Default,
                is_unique_key: true,
            },
            FieldDescriptor::text("title", 2.5, AnalyzerProfileKind::Default, true),
            FieldDescriptor::text("headings_h1", 2.5, AnalyzerProfileKind::Default, false),
            FieldDescriptor::text("headings_h2", 2.0, AnalyzerProfileKind::Default, false),
            FieldDescriptor::text("headings_other", 1.5, AnalyzerProfileKind::Default, false),
            FieldDescriptor::text("body", 1.0, AnalyzerProfileKind::Default, true),
            FieldDescriptor::text("code_blocks", 1.2, AnalyzerProfileKind::CodeFriendly, true),
            FieldDescriptor::text("url_path_tokens", 1.5, AnalyzerProfileKind::Default, false),
        ];
        Self::new(fields).expect("built-in schema is always valid")
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.indexed)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Dense, stable id used inside segment posting keys: the field's index
    /// in declaration order.
    pub fn field_id(&self, name: &str) -> Option<u16> {
        self.fields.iter().position(|f| f.name == name).map(|i| i as u16)
    }

    pub fn field_name(&self, id: u16) -> Option<&str> {
        self.fields.get(id as usize).map(|f| f.name.as_str())
    }

    pub fn unique_key_field(&self) -> &FieldDescriptor {
        self.fields
            .iter()
            .find(|f| f.is_unique_key)
            .expect("Schema::new enforces exactly one unique key field")
    }

    pub fn boost(&self, name: &str) -> f32 {
        self.field(name).map(|f| f.boost).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_has_one_key_field() {
        let schema = Schema::documentation_default();
        assert_eq!(schema.unique_key_field().name, "key");
        assert_eq!(schema.field_id("body"), Some(5));
        assert_eq!(schema.field_name(5), Some("body"));
    }

    #[test]
    fn rejects_zero_or_multiple_key_fields() {
        let mut fields = Schema::documentation_default().fields;
        fields[0].is_unique_key = false;
        assert_eq!(Schema::new(fields.clone()), Err(SchemaError::KeyFieldCount(0)));

        fields[0].is_unique_key = true;
        fields[1].is_unique_key = true;
        assert_eq!(Schema::new(fields), Err(SchemaError::KeyFieldCount(2)));
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let mut fields = Schema::documentation_default().fields;
        fields.push(fields[1].clone());
        assert!(matches!(
            Schema::new(fields),
            Err(SchemaError::DuplicateField(_))
        ));
    }
}
