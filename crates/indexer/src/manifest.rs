//! The `__search_segments/manifest` file: a pointer from a tenant's document
//! directory to the fingerprint of its currently-published segment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IndexerError;

pub const SEGMENTS_DIR: &str = "__search_segments";
pub const MANIFEST_FILE: &str = "manifest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub fingerprint: String,
}

pub fn segments_dir(docs_root: &Path) -> PathBuf {
    docs_root.join(SEGMENTS_DIR)
}

pub fn manifest_path(docs_root: &Path) -> PathBuf {
    segments_dir(docs_root).join(MANIFEST_FILE)
}

pub fn segment_path(docs_root: &Path, fingerprint: &str) -> PathBuf {
    segments_dir(docs_root).join(format!("{fingerprint}.db"))
}

/// Reads the manifest if present; `None` means no segment has ever been
/// published for this tenant (the `<IndexMissing>` case).
pub fn read_manifest(docs_root: &Path) -> Result<Option<Manifest>, IndexerError> {
    let path = manifest_path(docs_root);
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let manifest = serde_json::from_str(&contents)
                .map_err(|e| IndexerError::manifest(&path, e.to_string()))?;
            Ok(Some(manifest))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IndexerError::io(path, e)),
    }
}

/// Atomically (write-temp, fsync, rename) publishes `manifest` so a reader
/// never observes a half-written file.
pub fn write_manifest(docs_root: &Path, manifest: &Manifest) -> Result<(), IndexerError> {
    let dir = segments_dir(docs_root);
    std::fs::create_dir_all(&dir).map_err(|e| IndexerError::io(&dir, e))?;
    let final_path = manifest_path(docs_root);
    let tmp_path = dir.join(format!("manifest.{}.tmp", std::process::id()));

    let contents = serde_json::to_vec_pretty(manifest)
        .map_err(|e| IndexerError::manifest(&final_path, e.to_string()))?;
    {
        let mut file =
            std::fs::File::create(&tmp_path).map_err(|e| IndexerError::io(&tmp_path, e))?;
        use std::io::Write;
        file.write_all(&contents)
            .map_err(|e| IndexerError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| IndexerError::io(&tmp_path, e))?;
    }
    std::fs::rename(&tmp_path, &final_path).map_err(|e| IndexerError::io(&final_path, e))?;
    Ok(())
}
