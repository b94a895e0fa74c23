/// Playlist domain types
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{PlaylistId, UserId};

/// Sentinel source reference of the implicit per-user default playlist
pub const DEFAULT_PLAYLIST_SOURCE: &str = "default_playlist";

/// Display title given to the default playlist on creation
pub const DEFAULT_PLAYLIST_TITLE: &str = "Saved videos";

/// Lifecycle state of a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistStatus {
    /// Has (or may receive) unserved items
    Pending,
    /// Every item has been served
    Done,
}

impl PlaylistStatus {
    /// Convert status to canonical string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistStatus::Pending => "pending",
            PlaylistStatus::Done => "done",
        }
    }

    /// Normalize stored text into a status; null, blank, and
    /// unrecognized values read as `Pending`
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim).map(str::to_lowercase).as_deref() {
            Some("done") => PlaylistStatus::Done,
            _ => PlaylistStatus::Pending,
        }
    }
}

/// An ordered watch-queue owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owning user
    pub user_id: UserId,

    /// Source URL, or [`DEFAULT_PLAYLIST_SOURCE`] for the implicit queue
    pub source_url: String,

    /// Display title
    pub title: Option<String>,

    /// Sum of contained item durations, maintained incrementally
    pub total_duration_sec: i64,

    /// Lifecycle state
    pub status: PlaylistStatus,

    /// Creation timestamp
    pub created_at: NaiveDateTime,

    /// When an item was last served from this playlist
    pub last_served_at: Option<NaiveDateTime>,

    /// When the playlist transitioned to done
    pub completed_at: Option<NaiveDateTime>,
}

impl Playlist {
    /// Whether this is the user's implicit default playlist
    pub fn is_default(&self) -> bool {
        self.source_url == DEFAULT_PLAYLIST_SOURCE
    }
}

/// Data for inserting a new playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    /// Source URL the playlist was built from
    pub source_url: String,

    /// Display title
    pub title: Option<String>,

    /// Sum of item durations in seconds
    pub total_duration_sec: i64,
}

/// One row of the user-facing playlist listing.
///
/// `number` is the 1-based display position over the user's non-default
/// playlists, assigned by insertion order. It is derived at query time,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOverview {
    /// Playlist identifier
    pub id: PlaylistId,

    /// 1-based display position
    pub number: i64,

    /// Display title
    pub title: Option<String>,

    /// Source URL
    pub source_url: String,

    /// Lifecycle state
    pub status: PlaylistStatus,

    /// Summed duration of done items, in seconds
    pub watched_sec: i64,
}

/// Identity of a playlist removed by [`delete`], for confirmation
/// messaging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedPlaylist {
    /// Playlist identifier
    pub id: PlaylistId,

    /// Display title
    pub title: Option<String>,

    /// Source URL
    pub source_url: String,
}

/// Result of restarting a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Playlist reset to pending; `items_reset` items were reopened
    Restarted {
        /// Count of items flipped back to pending
        items_reset: u64,
    },
    /// Items were reopened but the playlist was already pending
    ItemsReset {
        /// Count of items flipped back to pending
        items_reset: u64,
    },
    /// Nothing needed resetting, or no such playlist for this user
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_status_round_trip() {
        assert_eq!(
            PlaylistStatus::parse(Some(PlaylistStatus::Done.as_str())),
            PlaylistStatus::Done
        );
        assert_eq!(PlaylistStatus::parse(Some(" DONE ")), PlaylistStatus::Done);
        assert_eq!(PlaylistStatus::parse(None), PlaylistStatus::Pending);
    }
}
