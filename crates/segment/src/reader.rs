use std::path::Path;

use redb::{Database, ReadableTable};

use crate::error::SegmentError;
use crate::keys;
use crate::meta::{CollectionStats, SegmentMeta, StoredDocument};
use crate::tables;
use crate::vbyte;

/// A single term's posting within one document: its `doc_id` and the
/// (delta-decoded) positions it occurs at within that field.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: u32,
    pub positions: Vec<u32>,
}

/// A read-only handle onto one on-disk, immutable segment.
///
/// `SegmentReader` opens the database once and serves any number of
/// concurrent read transactions afterward — redb's MVCC guarantees a reader
/// never observes a torn write, even while a writer is mid-publish on a
/// successor segment file.
pub struct SegmentReader {
    db: Database,
    meta: SegmentMeta,
    stats: CollectionStats,
}

impl SegmentReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SegmentError> {
        let path_str = path.as_ref().display().to_string();
        let db = Database::open(path.as_ref()).map_err(SegmentError::from)?;
        let meta = Self::read_meta(&db, &path_str)?;
        let stats = Self::read_stats(&db, &path_str)?;
        Ok(Self { db, meta, stats })
    }

    pub fn meta(&self) -> &SegmentMeta {
        &self.meta
    }

    pub fn collection_stats(&self) -> &CollectionStats {
        &self.stats
    }

    pub fn doc_id_for_key(&self, doc_key: &str) -> Result<Option<u32>, SegmentError> {
        let txn = self.db.begin_read().map_err(SegmentError::from)?;
        let table = txn.open_table(tables::DOC_KEYS).map_err(SegmentError::from)?;
        Ok(table
            .get(keys::doc_key_lookup_key(doc_key))
            .map_err(SegmentError::from)?
            .map(|v| u32::from_be_bytes(v.value().try_into().unwrap_or([0; 4]))))
    }

    pub fn docs_for_term(&self, field_id: u16, term: &str) -> Result<Vec<Posting>, SegmentError> {
        let txn = self.db.begin_read().map_err(SegmentError::from)?;
        let table = txn.open_table(tables::POSTINGS).map_err(SegmentError::from)?;
        let start = keys::posting_prefix(field_id, term);
        let end = keys::posting_prefix_end(field_id, term);

        let mut out = Vec::new();
        for entry in table
            .range(start.as_slice()..end.as_slice())
            .map_err(SegmentError::from)?
        {
            let (key, value) = entry.map_err(SegmentError::from)?;
            let doc_id = keys::decode_posting_key_doc_id(key.value());
            let positions = vbyte::decode_positions(value.value());
            out.push(Posting { doc_id, positions });
        }
        // Keys are stored big-endian, so the range scan already yields
        // ascending doc_id order — this is the tie-break the scorer relies on.
        Ok(out)
    }

    pub fn document_frequency(&self, field_id: u16, term: &str) -> Result<u32, SegmentError> {
        let txn = self.db.begin_read().map_err(SegmentError::from)?;
        let table = txn.open_table(tables::TERM_DF).map_err(SegmentError::from)?;
        let key = keys::term_df_key(field_id, term);
        Ok(table
            .get(key.as_slice())
            .map_err(SegmentError::from)?
            .map(|v| u32::from_be_bytes(v.value().try_into().unwrap_or([0; 4])))
            .unwrap_or(0))
    }

    pub fn field_length(&self, field_id: u16, doc_id: u32) -> Result<u32, SegmentError> {
        let txn = self.db.begin_read().map_err(SegmentError::from)?;
        let table = txn
            .open_table(tables::FIELD_LENGTHS)
            .map_err(SegmentError::from)?;
        let key = keys::field_length_key(field_id, doc_id);
        Ok(table
            .get(key.as_slice())
            .map_err(SegmentError::from)?
            .map(|v| u32::from_be_bytes(v.value().try_into().unwrap_or([0; 4])))
            .unwrap_or(0))
    }

    pub fn stored_document(&self, doc_id: u32) -> Result<Option<StoredDocument>, SegmentError> {
        let txn = self.db.begin_read().map_err(SegmentError::from)?;
        let table = txn
            .open_table(tables::STORED_DOCS)
            .map_err(SegmentError::from)?;
        match table
            .get(keys::stored_doc_key(doc_id).as_slice())
            .map_err(SegmentError::from)?
        {
            Some(value) => {
                let (doc, _) =
                    bincode::serde::decode_from_slice(value.value(), bincode::config::standard())?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    fn read_meta(db: &Database, path: &str) -> Result<SegmentMeta, SegmentError> {
        let txn = db.begin_read().map_err(SegmentError::from)?;
        let table = txn.open_table(tables::META).map_err(SegmentError::from)?;
        let get_str = |k: &str| -> Result<String, SegmentError> {
            table
                .get(k)
                .map_err(SegmentError::from)?
                .map(|v| String::from_utf8_lossy(v.value()).into_owned())
                .ok_or_else(|| SegmentError::corrupt(path, format!("missing meta key {k}")))
        };
        let get_u32 = |k: &str| -> Result<u32, SegmentError> {
            table
                .get(k)
                .map_err(SegmentError::from)?
                .map(|v| u32::from_be_bytes(v.value().try_into().unwrap_or([0; 4])))
                .ok_or_else(|| SegmentError::corrupt(path, format!("missing meta key {k}")))
        };
        let created_at_unix = table
            .get(keys::META_CREATED_AT_UNIX)
            .map_err(SegmentError::from)?
            .map(|v| i64::from_be_bytes(v.value().try_into().unwrap_or([0; 8])))
            .ok_or_else(|| SegmentError::corrupt(path, "missing created_at_unix"))?;

        Ok(SegmentMeta {
            doc_count: get_u32(keys::META_DOC_COUNT)?,
            schema_fingerprint: get_str(keys::META_SCHEMA_FINGERPRINT)?,
            content_fingerprint: get_str(keys::META_CONTENT_FINGERPRINT)?,
            created_at_unix,
        })
    }

    fn read_stats(db: &Database, path: &str) -> Result<CollectionStats, SegmentError> {
        let txn = db.begin_read().map_err(SegmentError::from)?;
        let table = txn.open_table(tables::META).map_err(SegmentError::from)?;
        let bytes = table
            .get("collection_stats")
            .map_err(SegmentError::from)?
            .ok_or_else(|| SegmentError::corrupt(path, "missing collection_stats"))?;
        Ok(serde_json::from_slice(bytes.value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SegmentBuilder;
    use docsearch_schema::{Document, Schema};

    fn doc(key: &str, title: &str, body: &str) -> Document {
        Document {
            key: key.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            headings_h1: vec![],
            headings_h2: vec![],
            headings_other: vec![],
            code_blocks: vec![],
            url_path_tokens: String::new(),
            metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn builds_and_reads_back_a_tiny_segment() {
        let schema = Schema::documentation_default();
        let docs = vec![
            doc("a", "Rust Basics", "rust is a systems language"),
            doc("b", "Go Basics", "go is also a systems language"),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segment.redb");

        let meta = SegmentBuilder::build(&schema, || docs.clone().into_iter(), &path).unwrap();
        assert_eq!(meta.doc_count, 2);

        let reader = SegmentReader::open(&path).unwrap();
        assert_eq!(reader.collection_stats().doc_count, 2);

        let body_field = schema.field_id("body").unwrap();
        let postings = reader.docs_for_term(body_field, "systems").unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].doc_id, 0);
        assert_eq!(postings[1].doc_id, 1);

        let df = reader.document_frequency(body_field, "systems").unwrap();
        assert_eq!(df, 2);

        let stored = reader.stored_document(0).unwrap().unwrap();
        assert_eq!(stored.key, "a");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let schema = Schema::documentation_default();
        let docs = vec![doc("a", "One", "one"), doc("a", "Two", "two")];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segment.redb");

        let err = SegmentBuilder::build(&schema, || docs.clone().into_iter(), &path).unwrap_err();
        assert!(matches!(err, SegmentError::DuplicateKey(_)));
    }
}
