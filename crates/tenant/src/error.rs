use docsearch_indexer::IndexerError;
use docsearch_scorer::ScorerError;
use docsearch_segment::SegmentError;
use thiserror::Error;

/// The tenant-facing error kinds from spec.md §4.5/§7.
#[derive(Debug, Error)]
pub enum TenantError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("tenant has no published segment yet")]
    TenantNotReady,
    #[error("segment is corrupt: {0}")]
    IndexCorrupt(#[from] SegmentError),
    #[error("no document found for uri {0:?}")]
    NotFound(String),
    #[error("operation not supported for this tenant's source kind: {0}")]
    NotSupported(String),
    #[error("scoring error: {0}")]
    Scorer(#[from] ScorerError),
    #[error("indexer error: {0}")]
    Indexer(#[from] IndexerError),
    #[error("io error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TenantError {
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
