//! Error types for the conversation subsystem.

use thiserror::Error;

/// Conversation subsystem error type.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Malformed entry submitted by a caller.
    #[error("validation error: {0}")]
    Validation(String),
    /// The backing store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<rusqlite::Error> for TranscriptError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<tokio_rusqlite::Error> for TranscriptError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Convenience result alias for conversation operations.
pub type TranscriptResult<T> = Result<T, TranscriptError>;
