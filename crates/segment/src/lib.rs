//! On-disk, immutable, columnar index segments backed by [`redb`], a pure
//! Rust embedded ACID key-value store used here as a clustered B-tree keyed
//! by `(field, term, doc_id)`.
//!
//! A segment is built once by [`builder::SegmentBuilder`] and never mutated
//! afterward; new documents produce a new segment file, and tenants publish
//! new segments by atomically swapping which file their reader points at
//! (see `docsearch-tenant`). [`reader::SegmentReader`] exposes the read
//! surface the scorer and fetch paths need: postings, field lengths, stored
//! fields, and corpus-wide stats.

mod builder;
mod error;
mod fingerprint;
mod keys;
mod meta;
mod reader;
mod tables;
mod vbyte;

pub use builder::SegmentBuilder;
pub use error::SegmentError;
pub use fingerprint::{hash_body, FingerprintAccumulator};
pub use meta::{CollectionStats, SegmentMeta, StoredDocument};
pub use reader::{Posting, SegmentReader};
