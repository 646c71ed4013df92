//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
///
/// The store absorbs all of these: quota rejections trigger trim-and-retry
/// and everything else degrades to a diagnostic log. Nothing here crosses
/// the store's public API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The write was rejected for exceeding the storage budget.
    #[error("quota exceeded: writing {attempted} bytes into {available} available")]
    QuotaExceeded {
        /// Size of the rejected value.
        attempted: u64,
        /// Free space at the time of the write.
        available: u64,
    },

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying storage system failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
