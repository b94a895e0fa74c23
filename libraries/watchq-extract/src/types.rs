/// Extraction result types
use serde::{Deserialize, Serialize};

/// What kind of thing a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A single video
    Video,
    /// An ordered collection of videos
    Playlist,
    /// Anything the extractor could not identify
    Unknown,
}

/// Metadata of a single video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    /// Video title, when the extractor produced one
    pub title: Option<String>,

    /// Canonical video URL
    pub url: String,

    /// Duration in seconds, when known
    pub duration_sec: Option<i64>,
}

/// One entry of an extracted playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// 1-based position within the playlist
    pub position: i64,

    /// Entry title
    pub title: Option<String>,

    /// Canonical video URL
    pub url: String,

    /// Duration in seconds, when known
    pub duration_sec: Option<i64>,
}

/// Metadata of an extracted playlist, unavailable entries already
/// filtered out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    /// Playlist title
    pub title: Option<String>,

    /// The URL the playlist was requested with
    pub source_url: String,

    /// Summed duration of all entries with a known duration
    pub total_duration_sec: i64,

    /// Ordered playable entries
    pub entries: Vec<PlaylistEntry>,
}
