use docsearch_segment::SegmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),
    #[error("document {0:?} has no stored fields to build a snippet from")]
    MissingStoredDocument(String),
}
