//! WatchQueue Core
//!
//! Platform-agnostic domain types and error handling for WatchQueue.
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Playlist`, `PlaylistItem`, statuses
//! - **Error Handling**: Unified `WatchqError` and `Result` types

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WatchqError};

pub use types::{
    DeletedPlaylist, ItemId, ItemStatus, NewItem, NewPlaylist, NextItem, Playlist, PlaylistId,
    PlaylistItem, PlaylistOverview, PlaylistStatus, RestartOutcome, User, UserId, UserStats,
    DEFAULT_PLAYLIST_SOURCE, DEFAULT_PLAYLIST_TITLE,
};
