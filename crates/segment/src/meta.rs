use serde::{Deserialize, Serialize};

use docsearch_schema::{Document, Schema};

/// Aggregate statistics a BM25F scorer needs: corpus size and the average
/// field length per indexed field (the length-normalization term).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionStats {
    pub doc_count: u32,
    /// `field_id -> average token count per document for that field`.
    /// Fields with zero occurrences across the corpus are omitted.
    pub avg_field_length: std::collections::HashMap<u16, f64>,
}

impl CollectionStats {
    pub fn avg_field_length(&self, field_id: u16) -> f64 {
        self.avg_field_length.get(&field_id).copied().unwrap_or(0.0)
    }
}

/// Segment identity and provenance, persisted in the `META` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentMeta {
    pub doc_count: u32,
    /// Hash of the `Schema` this segment was built against; a mismatch on
    /// open means the segment predates an incompatible schema change.
    pub schema_fingerprint: String,
    /// Content fingerprint over every document's `key`/body — see
    /// [`crate::fingerprint`].
    pub content_fingerprint: String,
    pub created_at_unix: i64,
}

/// The subset of a [`Document`]'s fields the schema marks `stored`, plus its
/// unique key and pass-through metadata — what `fetch` returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    pub key: String,
    pub fields: std::collections::HashMap<String, Vec<String>>,
    pub metadata: serde_json::Value,
}

impl StoredDocument {
    pub fn from_schema(schema: &Schema, doc: &Document) -> Self {
        let mut fields = std::collections::HashMap::new();
        for field in schema.fields() {
            if !field.stored {
                continue;
            }
            let values: Vec<String> = doc
                .field_values(&field.name)
                .into_iter()
                .map(str::to_string)
                .collect();
            fields.insert(field.name.clone(), values);
        }
        Self {
            key: doc.key.clone(),
            fields,
            metadata: doc.metadata.clone(),
        }
    }
}
