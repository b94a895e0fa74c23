//! WatchQueue Extract
//!
//! Link classification and extraction backend.
//!
//! Resolves a YouTube URL into a title/duration/entry list by driving
//! the external `yt-dlp` binary in JSON-dump mode. The rest of the
//! system consumes this through three calls: [`YtDlp::classify`],
//! [`YtDlp::fetch_video`], and [`YtDlp::fetch_playlist`].

mod error;
mod types;
mod ytdlp;

pub use error::ExtractError;
pub use types::{MediaKind, PlaylistEntry, PlaylistInfo, VideoInfo};
pub use ytdlp::YtDlp;

use regex::Regex;
use std::sync::OnceLock;

/// Whether the text looks like a YouTube link worth classifying
pub fn is_watch_link(text: &str) -> bool {
    static WATCH_URL_RE: OnceLock<Regex> = OnceLock::new();
    let re = WATCH_URL_RE.get_or_init(|| {
        Regex::new(r"(?i)^https?://(?:www\.)?(?:youtube\.com|youtu\.be)/\S+$")
            .expect("watch link pattern is valid")
    });
    re.is_match(text.trim())
}
