use std::path::PathBuf;
use thiserror::Error;

/// Crawler-facing error kinds (spec.md §4.9/§7).
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lease at {path} is held by {owner_id}")]
    LeaseHeld { path: PathBuf, owner_id: String },
    #[error("lease file at {path} is corrupt: {reason}")]
    LeaseCorrupt { path: PathBuf, reason: String },
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

impl CrawlerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
