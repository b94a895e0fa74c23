//! Core error types for WatchQueue
use thiserror::Error;

/// Result type alias using `WatchqError`
pub type Result<T> = std::result::Result<T, WatchqError>;

/// Core error type for WatchQueue
#[derive(Error, Debug)]
pub enum WatchqError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Link classification/extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl WatchqError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}
