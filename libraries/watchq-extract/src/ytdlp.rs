//! `yt-dlp` driver
//!
//! Runs the binary in JSON-dump mode (`-J`) and decodes the result.
//! Playlists are fetched flat so a thousand-entry playlist costs one
//! metadata pass, not a thousand.

use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use crate::error::{ExtractError, Result};
use crate::types::{MediaKind, PlaylistEntry, PlaylistInfo, VideoInfo};

/// Availability values yt-dlp reports for entries we cannot serve
const UNAVAILABLE: &[&str] = &["private", "needs_auth", "subscriber_only", "premium_only"];

/// Handle to the external `yt-dlp` binary
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    /// Create a driver for the given binary path
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Classify a link as a single video, a playlist, or unknown
    pub async fn classify(&self, link: &str) -> Result<MediaKind> {
        let json = self.dump(&["-J", "--flat-playlist"], link).await?;
        let info: RawInfo = serde_json::from_str(&json)?;
        Ok(match info.kind.as_deref() {
            Some("playlist") => MediaKind::Playlist,
            Some("video") | None => MediaKind::Video,
            _ => MediaKind::Unknown,
        })
    }

    /// Fetch metadata of a single video
    pub async fn fetch_video(&self, link: &str) -> Result<VideoInfo> {
        let json = self.dump(&["-J", "--no-playlist"], link).await?;
        video_from_json(&json, link)
    }

    /// Fetch a playlist's metadata and its playable entries, in order
    pub async fn fetch_playlist(&self, link: &str) -> Result<PlaylistInfo> {
        let json = self.dump(&["-J", "--flat-playlist"], link).await?;
        playlist_from_json(&json, link)
    }

    /// Run the binary and capture its JSON dump.
    ///
    /// The subprocess blocks, so it runs on the blocking pool.
    async fn dump(&self, args: &[&str], link: &str) -> Result<String> {
        let binary = self.binary.clone();
        let args: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
        let link = link.to_string();

        tokio::task::spawn_blocking(move || {
            let output = Command::new(&binary)
                .args(&args)
                .arg("--no-warnings")
                .arg(&link)
                .output()
                .map_err(|source| ExtractError::Spawn {
                    tool: binary.display().to_string(),
                    source,
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let mut message = format!("extractor failed for {link}");
                if !stderr.is_empty() {
                    message.push_str(": ");
                    message.push_str(&stderr);
                }
                return Err(ExtractError::Tool(message));
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        })
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
    }
}

/// Raw shape of yt-dlp's `-J` output; only the fields we read
#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(rename = "_type")]
    kind: Option<String>,
    id: Option<String>,
    title: Option<String>,
    webpage_url: Option<String>,
    duration: Option<f64>,
    availability: Option<String>,
    entries: Option<Vec<Option<RawInfo>>>,
}

impl RawInfo {
    /// Best URL for this entry: the canonical page URL, or one rebuilt
    /// from the video id
    fn watch_url(&self) -> Option<String> {
        self.webpage_url.clone().or_else(|| {
            self.id
                .as_ref()
                .map(|id| format!("https://www.youtube.com/watch?v={id}"))
        })
    }

    /// Whether the entry can actually be served to the user
    fn is_playable(&self) -> bool {
        if let Some(avail) = self.availability.as_deref() {
            if UNAVAILABLE.contains(&avail.to_lowercase().as_str()) {
                return false;
            }
        }
        let title = self.title.as_deref().unwrap_or("").to_lowercase();
        !(title.starts_with("[private") || title.starts_with("[deleted]"))
    }

    fn duration_sec(&self) -> Option<i64> {
        self.duration.map(|d| d as i64)
    }
}

fn video_from_json(json: &str, link: &str) -> Result<VideoInfo> {
    let info: RawInfo = serde_json::from_str(json)?;
    let url = info.watch_url().unwrap_or_else(|| link.to_string());
    let duration_sec = info.duration_sec();
    Ok(VideoInfo {
        url,
        title: info.title,
        duration_sec,
    })
}

fn playlist_from_json(json: &str, link: &str) -> Result<PlaylistInfo> {
    let info: RawInfo = serde_json::from_str(json)?;

    let mut entries = Vec::new();
    let mut total_sec = 0;

    for (idx, entry) in info.entries.unwrap_or_default().into_iter().enumerate() {
        let Some(entry) = entry else { continue };
        if !entry.is_playable() {
            continue;
        }
        let Some(url) = entry.watch_url() else {
            continue;
        };

        let duration_sec = entry.duration_sec();
        total_sec += duration_sec.unwrap_or(0);

        entries.push(PlaylistEntry {
            // Positions follow the source playlist's numbering;
            // filtered entries leave gaps.
            position: idx as i64 + 1,
            title: entry.title,
            url,
            duration_sec,
        });
    }

    Ok(PlaylistInfo {
        title: info.title,
        source_url: link.to_string(),
        total_duration_sec: total_sec,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_json_maps_to_video_info() {
        let json = r#"{
            "id": "abc123",
            "title": "A talk",
            "webpage_url": "https://www.youtube.com/watch?v=abc123",
            "duration": 612.0
        }"#;

        let video = video_from_json(json, "https://youtu.be/abc123").unwrap();
        assert_eq!(video.title.as_deref(), Some("A talk"));
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(video.duration_sec, Some(612));
    }

    #[test]
    fn video_json_falls_back_to_requested_link() {
        let video = video_from_json("{}", "https://youtu.be/abc123").unwrap();
        assert_eq!(video.url, "https://youtu.be/abc123");
        assert!(video.title.is_none());
        assert!(video.duration_sec.is_none());
    }

    #[test]
    fn playlist_json_filters_unavailable_entries() {
        let json = r#"{
            "_type": "playlist",
            "title": "Watch later",
            "entries": [
                {"id": "v1", "title": "First", "duration": 60},
                {"id": "v2", "title": "[Private video]", "duration": 90},
                {"id": "v3", "title": "Members only", "availability": "subscriber_only"},
                null,
                {"id": "v5", "title": "Last", "webpage_url": "https://www.youtube.com/watch?v=v5", "duration": 120.5}
            ]
        }"#;

        let playlist =
            playlist_from_json(json, "https://youtube.com/playlist?list=PL1").unwrap();
        assert_eq!(playlist.title.as_deref(), Some("Watch later"));
        assert_eq!(playlist.entries.len(), 2);
        assert_eq!(playlist.entries[0].position, 1);
        assert_eq!(playlist.entries[0].url, "https://www.youtube.com/watch?v=v1");
        assert_eq!(playlist.entries[1].position, 5);
        assert_eq!(playlist.entries[1].duration_sec, Some(120));
        assert_eq!(playlist.total_duration_sec, 180);
    }

    #[test]
    fn playlist_json_with_no_entries_is_empty() {
        let playlist =
            playlist_from_json(r#"{"_type": "playlist"}"#, "https://youtube.com/playlist?list=PL1")
                .unwrap();
        assert!(playlist.entries.is_empty());
        assert_eq!(playlist.total_duration_sec, 0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = playlist_from_json("not json", "x").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
