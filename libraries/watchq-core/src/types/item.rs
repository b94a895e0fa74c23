/// Playlist item domain types
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{ItemId, PlaylistId};

/// Lifecycle state of a playlist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Not served yet
    Pending,
    /// Explicitly skipped
    Skipped,
    /// Served and completed
    Done,
}

impl ItemStatus {
    /// Convert status to canonical string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Done => "done",
        }
    }

    /// Normalize stored text into a status.
    ///
    /// Case and surrounding whitespace are ignored. Null, blank, and
    /// unrecognized values read as `Pending`. `await` is accepted as a
    /// legacy alias for `Pending`.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim).map(str::to_lowercase).as_deref() {
            Some("skipped") => ItemStatus::Skipped,
            Some("done") => ItemStatus::Done,
            _ => ItemStatus::Pending,
        }
    }
}

/// One watch-queue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Unique item identifier
    pub id: ItemId,

    /// Owning playlist
    pub playlist_id: PlaylistId,

    /// Position within the playlist (null sorts first)
    pub position: Option<i64>,

    /// Video title
    pub title: Option<String>,

    /// Canonical video URL
    pub url: String,

    /// Duration in seconds, when known
    pub duration_sec: Option<i64>,

    /// Lifecycle state
    pub status: ItemStatus,

    /// When the item was marked done
    pub completed_at: Option<NaiveDateTime>,
}

/// Data for inserting a new playlist item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Position within the playlist, when the source dictates one
    pub position: Option<i64>,

    /// Video title
    pub title: Option<String>,

    /// Canonical video URL
    pub url: String,

    /// Duration in seconds, when known
    pub duration_sec: Option<i64>,
}

/// The next pending item of a playlist, as served to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextItem {
    /// Item identifier
    pub id: ItemId,

    /// Video URL to send
    pub url: String,

    /// Video title
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(ItemStatus::parse(Some("  DONE ")), ItemStatus::Done);
        assert_eq!(ItemStatus::parse(Some("Skipped")), ItemStatus::Skipped);
        assert_eq!(ItemStatus::parse(Some("pending")), ItemStatus::Pending);
    }

    #[test]
    fn parse_defaults_to_pending() {
        assert_eq!(ItemStatus::parse(None), ItemStatus::Pending);
        assert_eq!(ItemStatus::parse(Some("")), ItemStatus::Pending);
        assert_eq!(ItemStatus::parse(Some("   ")), ItemStatus::Pending);
        assert_eq!(ItemStatus::parse(Some("garbage")), ItemStatus::Pending);
    }

    #[test]
    fn parse_accepts_legacy_alias() {
        assert_eq!(ItemStatus::parse(Some("await")), ItemStatus::Pending);
    }
}
