//! redb table definitions shared by the builder and the reader.

use redb::TableDefinition;

/// `(field_id, term, doc_id)` -> vbyte-encoded delta positions.
pub const POSTINGS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("postings");
/// `(field_id, doc_id)` -> big-endian `u32` token count.
pub const FIELD_LENGTHS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("field_lengths");
/// `doc_id` -> bincode-encoded stored field map.
pub const STORED_DOCS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("stored_docs");
/// `doc_key` -> big-endian `u32` doc_id.
pub const DOC_KEYS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("doc_keys");
/// `(field_id, term)` -> big-endian `u32` document frequency.
pub const TERM_DF: TableDefinition<&[u8], &[u8]> = TableDefinition::new("term_df");
/// Small named scalars: doc count, fingerprints, creation time.
pub const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");
