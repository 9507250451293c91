//! Loads a tenant's normalized document directory into an ordered `Vec<Document>`.
//!
//! `docsearch-segment`'s builder requires its document-stream closure to
//! yield documents in the same order on both of its two calls; a sorted
//! directory walk (by relative path) gives that determinism for free and
//! also gives `build(schema, docs)` the "pure function of the sorted
//! corpus" property spec.md §8 requires of rebuilds.

use std::path::{Path, PathBuf};

use docsearch_schema::Document;

use crate::error::IndexerError;
use crate::markdown::parse_markdown_document;

/// Directories under a tenant root that hold index/scheduler bookkeeping,
/// never source documents.
const RESERVED_DIRS: &[&str] = &["__search_segments", "__scheduler_meta"];

/// Recursively collects every `.md` file under `docs_root`, sorted by its
/// path relative to `docs_root` so two walks of an unchanged directory agree
/// byte-for-byte on ordering.
pub fn discover_document_paths(docs_root: &Path) -> Result<Vec<PathBuf>, IndexerError> {
    let mut paths = Vec::new();
    walk(docs_root, docs_root, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), IndexerError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(IndexerError::io(dir, e)),
    };
    for entry in entries {
        let entry = entry.map_err(|e| IndexerError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| IndexerError::io(&path, e))?;
        if file_type.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if RESERVED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            walk(root, &path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            out.push(path);
        }
    }
    Ok(())
}

/// The document's corpus-unique key: its path relative to `docs_root`, with
/// forward-slash separators, independent of host path separator conventions.
pub fn key_for_path(docs_root: &Path, path: &Path) -> String {
    path.strip_prefix(docs_root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Reads and parses every document under `docs_root` into memory, in sorted
/// key order. The segment builder's contract needs an infallible, repeatable
/// iterator; loading once up front (documentation corpora are modest — spec's
/// memory bound applies to the builder's own per-document working set, not
/// this driver) keeps that contract simple.
pub fn load_documents(docs_root: &Path) -> Result<Vec<Document>, IndexerError> {
    let mut docs = Vec::new();
    for path in discover_document_paths(docs_root)? {
        let key = key_for_path(docs_root, &path);
        let contents = std::fs::read_to_string(&path).map_err(|e| IndexerError::io(&path, e))?;
        docs.push(parse_markdown_document(&key, &contents, &path)?);
    }
    Ok(docs)
}
