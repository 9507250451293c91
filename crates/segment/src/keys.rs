//! Byte-comparable key encodings for the segment's redb tables.
//!
//! Every key is built so that redb's default lexicographic `&[u8]` ordering
//! matches the logical ordering the reader needs (ascending `doc_id` within
//! a term, ascending field id within a document) without a custom key type.

pub const META_SCHEMA_FINGERPRINT: &str = "schema_fingerprint";
pub const META_DOC_COUNT: &str = "doc_count";
pub const META_CREATED_AT_UNIX: &str = "created_at_unix";
pub const META_CONTENT_FINGERPRINT: &str = "content_fingerprint";

/// `(field_id, term, doc_id)` -> vbyte-encoded delta positions.
///
/// Fixed-width big-endian integers keep the encoding byte-comparable: all
/// postings for a field sort together, then alphabetically by term, then
/// ascending by `doc_id` — exactly the order `docs_for_term` needs to
/// satisfy the ascending-doc_id tie-break without an in-memory sort.
pub fn posting_key(field_id: u16, term: &str, doc_id: u32) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + term.len() + 1 + 4);
    key.extend_from_slice(&field_id.to_be_bytes());
    key.extend_from_slice(term.as_bytes());
    key.push(0); // NUL separator: terms never contain NUL post-normalization
    key.extend_from_slice(&doc_id.to_be_bytes());
    key
}

/// Prefix shared by every posting of `(field_id, term)`, used as a scan
/// lower bound; the matching upper bound is this prefix with the separator
/// byte bumped to `0x01`.
pub fn posting_prefix(field_id: u16, term: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + term.len() + 1);
    key.extend_from_slice(&field_id.to_be_bytes());
    key.extend_from_slice(term.as_bytes());
    key.push(0);
    key
}

pub fn posting_prefix_end(field_id: u16, term: &str) -> Vec<u8> {
    let mut key = posting_prefix(field_id, term);
    *key.last_mut().expect("prefix always has a separator byte") = 1;
    key
}

pub fn decode_posting_key_doc_id(key: &[u8]) -> u32 {
    let len = key.len();
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&key[len - 4..]);
    u32::from_be_bytes(buf)
}

/// `(field_id, doc_id)` -> little-endian `u32` field length in tokens.
pub fn field_length_key(field_id: u16, doc_id: u32) -> [u8; 6] {
    let mut key = [0u8; 6];
    key[0..2].copy_from_slice(&field_id.to_be_bytes());
    key[2..6].copy_from_slice(&doc_id.to_be_bytes());
    key
}

/// `(field_id, term)` -> little-endian `u32` document frequency.
pub fn term_df_key(field_id: u16, term: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + term.len());
    key.extend_from_slice(&field_id.to_be_bytes());
    key.extend_from_slice(term.as_bytes());
    key
}

/// `doc_id` -> bincode-encoded stored document.
pub fn stored_doc_key(doc_id: u32) -> [u8; 4] {
    doc_id.to_be_bytes()
}

/// `doc_key` (the document's unique-key field value) -> `doc_id`.
pub fn doc_key_lookup_key(doc_key: &str) -> &[u8] {
    doc_key.as_bytes()
}
