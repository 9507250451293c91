//! Drives `docsearch_segment::SegmentBuilder` over a tenant's document
//! directory and atomically publishes the resulting segment + manifest.

use std::path::Path;
use std::time::Instant;

use docsearch_schema::Schema;
use docsearch_segment::{SegmentBuilder, SegmentMeta};
use tracing::{info, warn};

use crate::error::IndexerError;
use crate::manifest::{self, Manifest};
use crate::source::load_documents;

/// Builds a new segment from `docs_root`'s current contents and publishes it
/// as the tenant's current segment.
///
/// Build failures leave no partial file visible under the final fingerprint
/// path: the segment is built under a process-unique temporary name inside
/// `__search_segments/`, then renamed into place — `rename` is atomic on the
/// same filesystem, so a reader opening by the manifest's fingerprint either
/// finds the whole file or nothing, never a partial one. The manifest itself
/// is published the same way (see `manifest::write_manifest`).
pub fn build_segment(docs_root: &Path, schema: &Schema) -> Result<SegmentMeta, IndexerError> {
    let start = Instant::now();
    let span = tracing::span!(tracing::Level::INFO, "indexer.build", docs_root = %docs_root.display());
    let _guard = span.enter();

    let docs = load_documents(docs_root)?;
    let doc_count = docs.len();

    let segments_dir = manifest::segments_dir(docs_root);
    std::fs::create_dir_all(&segments_dir).map_err(|e| IndexerError::io(&segments_dir, e))?;
    let tmp_path = segments_dir.join(format!("build-{}.tmp", std::process::id()));
    // Builder requires the target path not to already exist.
    let _ = std::fs::remove_file(&tmp_path);

    let meta = match SegmentBuilder::build(schema, || docs.clone().into_iter(), &tmp_path) {
        Ok(meta) => meta,
        Err(e) => {
            let _ = std::fs::remove_file(&tmp_path);
            warn!(error = %e, elapsed_micros = start.elapsed().as_micros(), "index_build_failure");
            return Err(IndexerError::Segment(e));
        }
    };

    let final_path = manifest::segment_path(docs_root, &meta.content_fingerprint);
    std::fs::rename(&tmp_path, &final_path).map_err(|e| IndexerError::io(&final_path, e))?;

    manifest::write_manifest(
        docs_root,
        &Manifest {
            fingerprint: meta.content_fingerprint.clone(),
        },
    )?;

    vacuum_stale_segments(&segments_dir, &meta.content_fingerprint);

    info!(
        doc_count,
        fingerprint = %meta.content_fingerprint,
        elapsed_micros = start.elapsed().as_micros(),
        "index_build_success"
    );
    Ok(meta)
}

/// Removes prior segment files once a new one is published. Best-effort: a
/// failure to remove a stale segment is a warning, never fatal — the
/// manifest already points past it, so it's dead weight, not corruption.
fn vacuum_stale_segments(segments_dir: &Path, keep_fingerprint: &str) {
    let Ok(entries) = std::fs::read_dir(segments_dir) else {
        return;
    };
    let keep_name = format!("{keep_fingerprint}.db");
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".db") && name != keep_name.as_str() {
            if let Err(e) = std::fs::remove_file(entry.path()) {
                warn!(path = %entry.path().display(), error = %e, "index_vacuum_failure");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_segment::SegmentReader;

    #[test]
    fn builds_and_publishes_a_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "# Hello\n\nhello world\n").unwrap();

        let schema = Schema::documentation_default();
        let meta = build_segment(dir.path(), &schema).unwrap();

        let manifest = manifest::read_manifest(dir.path()).unwrap().unwrap();
        assert_eq!(manifest.fingerprint, meta.content_fingerprint);

        let segment_path = manifest::segment_path(dir.path(), &manifest.fingerprint);
        let reader = SegmentReader::open(&segment_path).unwrap();
        assert_eq!(reader.collection_stats().doc_count, 1);
    }

    #[test]
    fn rebuilding_unchanged_corpus_yields_same_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "# Hello\n\nhello world\n").unwrap();

        let schema = Schema::documentation_default();
        let first = build_segment(dir.path(), &schema).unwrap();
        let second = build_segment(dir.path(), &schema).unwrap();

        assert_eq!(first.content_fingerprint, second.content_fingerprint);
        // Vacuum leaves exactly one segment file on disk.
        let segments_dir = manifest::segments_dir(dir.path());
        let db_files: Vec<_> = std::fs::read_dir(&segments_dir)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".db"))
            .collect();
        assert_eq!(db_files.len(), 1);
    }
}
