/// Extraction-specific errors
use thiserror::Error;

/// Result type alias using `ExtractError`
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors from the link extraction backend
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The extractor binary could not be spawned
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// Binary that failed to start
        tool: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The extractor ran but reported failure
    #[error("{0}")]
    Tool(String),

    /// The extractor produced output we could not decode
    #[error("unexpected extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The blocking extraction task was cancelled or panicked
    #[error("extraction task failed: {0}")]
    Task(String),
}

impl From<ExtractError> for watchq_core::WatchqError {
    fn from(err: ExtractError) -> Self {
        watchq_core::WatchqError::Extraction(err.to_string())
    }
}
