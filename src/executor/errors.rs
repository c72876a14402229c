//! Storage error type
//!
//! Repositories report failures as a [`StorageError`]; the compiler wraps it
//! in [`QueryError::Storage`](crate::planner::QueryError::Storage) with code
//! `ENTRY_STORAGE_FAILED`.

use thiserror::Error;

/// A repository failed to load or execute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Storage failed: {message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("invalid fixture: {}", err))
    }
}

/// Result type for repository operations
pub type StorageResult<T> = Result<T, StorageError>;
