/// ID types for WatchQueue entities
///
/// All entities are keyed by SQLite rowids.

/// User identifier
pub type UserId = i64;

/// Playlist identifier
pub type PlaylistId = i64;

/// Playlist item identifier
pub type ItemId = i64;
