use std::path::PathBuf;
use thiserror::Error;

use docsearch_crawler::CrawlerError;
use docsearch_indexer::IndexerError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("indexer error: {0}")]
    Indexer(#[from] IndexerError),
    #[error("crawler error: {0}")]
    Crawler(#[from] CrawlerError),
    #[error("invalid cadence expression {expression:?}: {reason}")]
    Cadence { expression: String, reason: String },
    #[error("sync.json is corrupt at {path}: {reason}")]
    StateCorrupt { path: PathBuf, reason: String },
}

impl SchedulerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
