//! Detects drift between a tenant's source directory and its published
//! segment, and optionally triggers a rebuild.

use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use docsearch_schema::Schema;
use docsearch_segment::FingerprintAccumulator;
use tracing::{info, warn};

use crate::build::build_segment;
use crate::error::IndexerError;
use crate::manifest::read_manifest;
use crate::source::load_documents;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The manifest's fingerprint matches the source directory's current
    /// content; the published segment is up to date.
    Ok,
    /// A segment is published but its fingerprint no longer matches the
    /// source directory.
    Stale,
    /// No manifest/segment has ever been published for this tenant.
    Missing,
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub outcome: AuditOutcome,
    pub expected_fingerprint: String,
    pub manifest_fingerprint: Option<String>,
    /// Set when a rebuild was triggered (and succeeded) as part of this call.
    pub rebuilt: bool,
}

/// Computes `expected_fingerprint(source)` (spec.md §4.1's fingerprint
/// function, streamed over the source directory rather than a segment's
/// already-built postings) and compares it to the manifest.
///
/// Side-effect-free when `dry_run`; otherwise triggers `build_segment` on
/// `Stale`/`Missing`.
pub fn audit(docs_root: &Path, schema: &Schema, dry_run: bool) -> Result<AuditReport, IndexerError> {
    let start = Instant::now();
    let expected_fingerprint = expected_fingerprint(docs_root)?;
    let manifest_fingerprint = read_manifest(docs_root)?.map(|m| m.fingerprint);

    let outcome = match &manifest_fingerprint {
        None => AuditOutcome::Missing,
        Some(fp) if *fp == expected_fingerprint => AuditOutcome::Ok,
        Some(_) => AuditOutcome::Stale,
    };

    let mut rebuilt = false;
    if !dry_run && outcome != AuditOutcome::Ok {
        build_segment(docs_root, schema)?;
        rebuilt = true;
    }

    info!(
        outcome = ?outcome,
        dry_run,
        rebuilt,
        elapsed_micros = start.elapsed().as_micros(),
        "index_audit_complete"
    );

    Ok(AuditReport {
        outcome,
        expected_fingerprint,
        manifest_fingerprint,
        rebuilt,
    })
}

/// Same as [`audit`], but bounded by `timeout`. An exceeded timeout is a
/// warning (spec.md §4.4's failure model — "never blocks the read path"),
/// not an error: the caller gets `Ok(None)` and should treat the tenant as
/// still on its previously published segment.
pub fn audit_with_timeout(
    docs_root: &Path,
    schema: &Schema,
    dry_run: bool,
    timeout: Duration,
) -> Result<Option<AuditReport>, IndexerError> {
    let docs_root = docs_root.to_path_buf();
    let schema = schema.clone();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let result = audit(&docs_root, &schema, dry_run);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result.map(Some),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(timeout_ms = timeout.as_millis(), "index_audit_timeout");
            Ok(None)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Ok(None),
    }
}

/// Streams the source directory's documents and computes the same
/// content-fingerprint function the segment builder uses, without building a
/// segment — this is what makes the audit cheap relative to a rebuild.
fn expected_fingerprint(docs_root: &Path) -> Result<String, IndexerError> {
    let docs = load_documents(docs_root)?;
    let mut acc = FingerprintAccumulator::new();
    for doc in &docs {
        acc.push(&doc.key, &doc.body);
    }
    Ok(acc.finalize())
}
