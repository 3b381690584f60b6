//! Error types for the spread engine.

use oracle_core::SpreadId;
use thiserror::Error;

/// Result type for spread operations.
pub type SpreadResult<T> = Result<T, SpreadError>;

/// Errors that can occur while drawing, interpreting, or storing a spread.
///
/// Interpretation failures are deliberately absent: they always resolve to a
/// fallback text instead.
#[derive(Debug, Error)]
pub enum SpreadError {
    /// The operation is not valid in the session's current stage.
    #[error("cannot {operation} while {stage}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The stage the session was in.
        stage: &'static str,
    },

    /// `begin` was called on a session that is not idle.
    #[error("a spread is already in progress ({0})")]
    AlreadyInProgress(&'static str),

    /// A caller-supplied argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The selected card was not among the offered choices.
    #[error("card \"{0}\" was not offered")]
    NotOffered(String),

    /// No saved spread has this id.
    #[error("spread not found: {0}")]
    NotFound(SpreadId),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised by a [`BlobStore`](crate::storage::BlobStore) or while
/// (de)serialising its contents.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("corrupt stored data under \"{key}\": {source}")]
    Corrupt {
        /// The storage key.
        key: String,
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// The backend refused the write.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
