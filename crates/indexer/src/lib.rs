//! Two-pass segment indexer (C4) and source/segment fingerprint audit (C5).
//!
//! [`build_segment`] reads a tenant's normalized markdown directory, drives
//! `docsearch_segment::SegmentBuilder` over it, and atomically publishes the
//! resulting segment and manifest. [`audit`]/[`audit_with_timeout`] compare
//! the manifest's fingerprint against the source directory's current
//! content without rebuilding, and can optionally trigger a rebuild on
//! drift.

mod audit;
mod build;
mod error;
mod manifest;
mod markdown;
mod source;

pub use audit::{audit, audit_with_timeout, AuditOutcome, AuditReport};
pub use build::build_segment;
pub use error::IndexerError;
pub use manifest::{manifest_path, read_manifest, segment_path, segments_dir, Manifest};
pub use markdown::parse_markdown_document;
pub use source::{discover_document_paths, key_for_path, load_documents};
