/// Bot error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Errors crossing the bot's handler boundary.
///
/// Storage and extraction failures are normally caught inside the
/// handlers and turned into one user-facing sentence; what propagates
/// out of an endpoint is almost always a transport failure, which the
/// dispatcher's logging error handler picks up.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] watchq_storage::StorageError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] watchq_extract::ExtractError),

    #[error("Telegram error: {0}")]
    Transport(#[from] teloxide::RequestError),
}
