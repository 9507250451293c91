use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("segment storage error: {0}")]
    Backend(String),
    #[error("segment encode error: {0}")]
    Encode(String),
    #[error("segment decode error: {0}")]
    Decode(String),
    #[error("segment at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("document key {0:?} already exists in this segment")]
    DuplicateKey(String),
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

impl SegmentError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn corrupt<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<bincode::error::EncodeError> for SegmentError {
    fn from(e: bincode::error::EncodeError) -> Self {
        SegmentError::Encode(e.to_string())
    }
}

impl From<bincode::error::DecodeError> for SegmentError {
    fn from(e: bincode::error::DecodeError) -> Self {
        SegmentError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for SegmentError {
    fn from(e: serde_json::Error) -> Self {
        SegmentError::Decode(e.to_string())
    }
}

impl From<redb::DatabaseError> for SegmentError {
    fn from(e: redb::DatabaseError) -> Self {
        SegmentError::backend(e)
    }
}

impl From<redb::TransactionError> for SegmentError {
    fn from(e: redb::TransactionError) -> Self {
        SegmentError::backend(e)
    }
}

impl From<redb::TableError> for SegmentError {
    fn from(e: redb::TableError) -> Self {
        SegmentError::backend(e)
    }
}

impl From<redb::StorageError> for SegmentError {
    fn from(e: redb::StorageError) -> Self {
        SegmentError::backend(e)
    }
}

impl From<redb::CommitError> for SegmentError {
    fn from(e: redb::CommitError) -> Self {
        SegmentError::backend(e)
    }
}
