//! Error types for the metadata store.

use thiserror::Error;

/// Result type alias for metadata store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during metadata store operations.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A compare-and-swap saw a stored record that diverged from the
    /// caller's expected image.
    #[error("condition failed: {0}")]
    ConditionFailed(String),

    /// A content-addressed write found an existing file with the same id
    /// but different content.
    #[error("config content mismatch: {0}")]
    ConfigMismatch(String),

    #[error("malformed file id: {0}")]
    MalformedFileId(String),
}
