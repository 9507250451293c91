use std::path::PathBuf;

use docsearch_segment::SegmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("malformed manifest at {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
}

impl IndexerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn front_matter(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::FrontMatter {
            path: path.into(),
            source,
        }
    }

    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
