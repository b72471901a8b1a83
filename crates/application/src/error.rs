//! Application error types

use thiserror::Error;

/// Errors from the token persistence port.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O operation on the backing store failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be serialized or parsed.
    #[error("storage serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
