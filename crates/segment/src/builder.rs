//! Two-pass segment builder.
//!
//! Pass 1 streams the document source once, assigning dense `doc_id`s in
//! scan order and accumulating per-field token counts and document
//! frequencies; nothing from one document's tokenization survives past that
//! document's iteration, so peak builder memory is bounded by the largest
//! single document, not the corpus. Pass 2 re-streams the *same* document
//! source (callers must supply a deterministic iterator, e.g. a sorted
//! directory walk) and writes postings keyed `(field_id, term, doc_id)` —
//! redb's clustered B-tree keeps them in final sorted order with no
//! separate sort step.

use std::collections::HashMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use docsearch_schema::{Document, Schema};
use redb::{Database, ReadableTable};
use sha2::{Digest, Sha256};

use crate::error::SegmentError;
use crate::fingerprint::FingerprintAccumulator;
use crate::keys;
use crate::meta::{CollectionStats, SegmentMeta, StoredDocument};
use crate::tables;

pub struct SegmentBuilder;

impl SegmentBuilder {
    /// Build a new segment at `path` from the documents yielded by `docs`.
    /// `docs` is called twice and must yield documents in the same order
    /// both times; `path` must not already exist.
    pub fn build<F, I>(schema: &Schema, docs: F, path: impl AsRef<Path>) -> Result<SegmentMeta, SegmentError>
    where
        F: Fn() -> I,
        I: Iterator<Item = Document>,
    {
        let path = path.as_ref();
        let db = Database::create(path).map_err(SegmentError::from)?;

        let (doc_count, sum_field_length, fingerprint) = Self::pass_one(&db, schema, docs())?;
        Self::pass_two(&db, schema, docs())?;

        let avg_field_length = sum_field_length
            .into_iter()
            .filter(|(_, sum)| *sum > 0)
            .map(|(field_id, sum)| (field_id, sum as f64 / doc_count.max(1) as f64))
            .collect::<HashMap<_, _>>();

        let stats = CollectionStats {
            doc_count,
            avg_field_length,
        };
        let schema_fingerprint = Self::schema_fingerprint(schema);
        let created_at_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        let meta = SegmentMeta {
            doc_count,
            schema_fingerprint,
            content_fingerprint: fingerprint,
            created_at_unix,
        };
        Self::write_meta(&db, &stats, &meta)?;

        Ok(meta)
    }

    fn pass_one(
        db: &Database,
        schema: &Schema,
        docs: impl Iterator<Item = Document>,
    ) -> Result<(u32, HashMap<u16, u64>, String), SegmentError> {
        let txn = db.begin_write().map_err(SegmentError::from)?;
        let mut doc_id: u32 = 0;
        let mut sum_field_length: HashMap<u16, u64> = HashMap::new();
        let mut fingerprint = FingerprintAccumulator::new();

        {
            let mut doc_keys = txn.open_table(tables::DOC_KEYS).map_err(SegmentError::from)?;
            let mut field_lengths = txn
                .open_table(tables::FIELD_LENGTHS)
                .map_err(SegmentError::from)?;
            let mut term_df = txn.open_table(tables::TERM_DF).map_err(SegmentError::from)?;
            let mut stored_docs = txn
                .open_table(tables::STORED_DOCS)
                .map_err(SegmentError::from)?;

            for doc in docs {
                if doc.key.is_empty() {
                    return Err(SegmentError::corrupt("<builder>", "document key is empty"));
                }
                let key_bytes = keys::doc_key_lookup_key(&doc.key);
                if doc_keys.get(key_bytes).map_err(SegmentError::from)?.is_some() {
                    return Err(SegmentError::DuplicateKey(doc.key.clone()));
                }
                doc_keys
                    .insert(key_bytes, doc_id.to_be_bytes().as_slice())
                    .map_err(SegmentError::from)?;

                fingerprint.push(&doc.key, &doc.body);

                let mut distinct_terms: std::collections::HashSet<(u16, String)> =
                    std::collections::HashSet::new();

                for field in schema.indexed_fields() {
                    let field_id = schema
                        .field_id(&field.name)
                        .expect("indexed field is always present in its own schema");
                    let values = doc.field_values(&field.name);
                    let analyzer = field.analyzer_profile.analyzer();
                    let tokens = docsearch_schema::tokenize_field_values(analyzer.as_ref(), &values);

                    field_lengths
                        .insert(
                            keys::field_length_key(field_id, doc_id).as_slice(),
                            (tokens.len() as u32).to_be_bytes().as_slice(),
                        )
                        .map_err(SegmentError::from)?;
                    *sum_field_length.entry(field_id).or_insert(0) += tokens.len() as u64;

                    for (term, _pos) in &tokens {
                        distinct_terms.insert((field_id, term.clone()));
                    }
                }

                for (field_id, term) in distinct_terms {
                    let df_key = keys::term_df_key(field_id, &term);
                    let current = term_df
                        .get(df_key.as_slice())
                        .map_err(SegmentError::from)?
                        .map(|v| u32::from_be_bytes(v.value().try_into().unwrap_or([0; 4])))
                        .unwrap_or(0);
                    term_df
                        .insert(df_key.as_slice(), (current + 1).to_be_bytes().as_slice())
                        .map_err(SegmentError::from)?;
                }

                stored_docs
                    .insert(
                        keys::stored_doc_key(doc_id).as_slice(),
                        bincode::serde::encode_to_vec(
                            StoredDocument::from_schema(schema, &doc),
                            bincode::config::standard(),
                        )?
                        .as_slice(),
                    )
                    .map_err(SegmentError::from)?;

                doc_id += 1;
            }
        }

        txn.commit().map_err(SegmentError::from)?;
        Ok((doc_id, sum_field_length, fingerprint.finalize()))
    }

    fn pass_two(
        db: &Database,
        schema: &Schema,
        docs: impl Iterator<Item = Document>,
    ) -> Result<(), SegmentError> {
        let txn = db.begin_write().map_err(SegmentError::from)?;
        {
            let mut postings = txn.open_table(tables::POSTINGS).map_err(SegmentError::from)?;
            let mut doc_id: u32 = 0;

            for doc in docs {
                for field in schema.indexed_fields() {
                    let field_id = schema
                        .field_id(&field.name)
                        .expect("indexed field is always present in its own schema");
                    let values = doc.field_values(&field.name);
                    let analyzer = field.analyzer_profile.analyzer();
                    let tokens = docsearch_schema::tokenize_field_values(analyzer.as_ref(), &values);

                    let mut by_term: HashMap<&str, Vec<u32>> = HashMap::new();
                    for (term, pos) in &tokens {
                        by_term.entry(term.as_str()).or_default().push(*pos);
                    }

                    for (term, positions) in by_term {
                        let key = keys::posting_key(field_id, term, doc_id);
                        let encoded = crate::vbyte::encode_positions(&positions);
                        postings
                            .insert(key.as_slice(), encoded.as_slice())
                            .map_err(SegmentError::from)?;
                    }
                }
                doc_id += 1;
            }
        }
        txn.commit().map_err(SegmentError::from)?;
        Ok(())
    }

    fn write_meta(
        db: &Database,
        stats: &CollectionStats,
        meta: &SegmentMeta,
    ) -> Result<(), SegmentError> {
        let txn = db.begin_write().map_err(SegmentError::from)?;
        {
            let mut table = txn.open_table(tables::META).map_err(SegmentError::from)?;
            table
                .insert(keys::META_DOC_COUNT, meta.doc_count.to_be_bytes().as_slice())
                .map_err(SegmentError::from)?;
            table
                .insert(
                    keys::META_SCHEMA_FINGERPRINT,
                    meta.schema_fingerprint.as_bytes(),
                )
                .map_err(SegmentError::from)?;
            table
                .insert(
                    keys::META_CONTENT_FINGERPRINT,
                    meta.content_fingerprint.as_bytes(),
                )
                .map_err(SegmentError::from)?;
            table
                .insert(
                    keys::META_CREATED_AT_UNIX,
                    meta.created_at_unix.to_be_bytes().as_slice(),
                )
                .map_err(SegmentError::from)?;
            let stats_bytes = serde_json::to_vec(stats)?;
            table
                .insert("collection_stats", stats_bytes.as_slice())
                .map_err(SegmentError::from)?;
        }
        txn.commit().map_err(SegmentError::from)?;
        Ok(())
    }

    /// Hash of the schema's field declarations (name, kind, boost, analyzer),
    /// used to detect when an on-disk segment predates an incompatible
    /// schema change.
    fn schema_fingerprint(schema: &Schema) -> String {
        let mut hasher = Sha256::new();
        for field in schema.fields() {
            hasher.update(field.name.as_bytes());
            hasher.update([field.kind as u8]);
            hasher.update(field.boost.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
