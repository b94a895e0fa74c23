//! Reply rendering
//!
//! Turns storage results into Telegram messages. Everything the user
//! ever typed or that came from an extracted title is HTML-escaped
//! before it lands inside markup.

use teloxide::utils::html::escape;
use watchq_core::types::{DeletedPlaylist, PlaylistOverview, RestartOutcome, UserStats};

/// Fixed reply for a user with no saved playlists
pub const NO_PLAYLISTS: &str = "No playlists saved";

/// Title shown when an item or playlist has none
const UNTITLED: &str = "(untitled)";

/// The numbered playlist listing, as HTML
pub fn playlists_text(playlists: &[PlaylistOverview]) -> String {
    if playlists.is_empty() {
        return NO_PLAYLISTS.to_string();
    }

    let mut lines = vec!["Your playlists:\n".to_string()];
    for p in playlists {
        let title = escape(p.title.as_deref().unwrap_or(UNTITLED));
        let link = escape(&p.source_url);
        let minutes = p.watched_sec / 60;

        lines.push(format!(
            "{} {}\n🔗 <a href=\"{}\">link</a>\nStatus: {}\nWatched: {} min\n",
            p.number,
            title,
            link,
            p.status.as_str(),
            minutes
        ));
    }
    lines.join("\n")
}

/// The statistics reply, with the six-block progress bar
pub fn stats_text(stats: &UserStats) -> String {
    // The implicit default playlist is not shown in the count
    let shown_playlists = (stats.playlist_count - 1).max(0);
    let percentage = stats.done_percentage();

    format!(
        "Your statistics:\n\n\
         Playlists: {}\n\
         Videos done: {}\n\
         Videos pending: {}\n\n\
         ⏳ Time pending: {}\n\
         ⌛ Time watched: {}\n\n\
         Progress: {}({percentage}%)",
        shown_playlists,
        stats.done_count,
        stats.pending_count,
        hours_minutes(stats.pending_sec),
        hours_minutes(stats.done_sec),
        progress_blocks(percentage),
    )
}

/// Confirmation reply for a deleted playlist, as HTML
pub fn deleted_text(deleted: &DeletedPlaylist) -> String {
    format!(
        "Deleted:\n{} {}\n🔗 <a href=\"{}\">link</a>",
        deleted.id,
        escape(deleted.title.as_deref().unwrap_or(UNTITLED)),
        escape(&deleted.source_url)
    )
}

/// Summary reply for a restart, covering all three outcomes
pub fn restart_text(outcome: RestartOutcome) -> String {
    match outcome {
        RestartOutcome::Restarted { items_reset } => {
            format!("Playlist restarted.\nItems reset: {items_reset}.")
        }
        RestartOutcome::ItemsReset { items_reset } => {
            format!("Items reset: {items_reset}.\nPlaylist was already pending.")
        }
        RestartOutcome::Unchanged => "Nothing to restart.".to_string(),
    }
}

/// Format seconds as hours and minutes, dropping a zero hour part
fn hours_minutes(total_sec: i64) -> String {
    let minutes = total_sec / 60;
    let hours = minutes / 60;
    if hours > 0 {
        format!("{} h {} min", hours, minutes - hours * 60)
    } else {
        format!("{minutes} min")
    }
}

/// Six-block progress bar quantized at 20%-steps
fn progress_blocks(percentage: i64) -> &'static str {
    if percentage == 100 {
        "⬛⬛⬛⬛⬛⬛"
    } else if percentage >= 80 {
        "⬛⬛⬛⬛⬛⬜"
    } else if percentage >= 60 {
        "⬛⬛⬛⬛⬜⬜"
    } else if percentage >= 40 {
        "⬛⬛⬛⬜⬜⬜"
    } else if percentage >= 20 {
        "⬛⬛⬜⬜⬜⬜"
    } else {
        "⬛⬜⬜⬜⬜⬜"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchq_core::types::PlaylistStatus;

    fn overview(number: i64, title: &str, watched_sec: i64) -> PlaylistOverview {
        PlaylistOverview {
            id: number * 10,
            number,
            title: Some(title.to_string()),
            source_url: format!("https://youtube.com/playlist?list=PL{number}"),
            status: PlaylistStatus::Pending,
            watched_sec,
        }
    }

    #[test]
    fn empty_listing_has_fixed_message() {
        assert_eq!(playlists_text(&[]), NO_PLAYLISTS);
    }

    #[test]
    fn listing_numbers_and_escapes() {
        let text = playlists_text(&[
            overview(1, "Rust <talks> & more", 3600),
            overview(2, "Cooking", 90),
        ]);

        assert!(text.contains("1 Rust &lt;talks&gt; &amp; more"));
        assert!(text.contains("Watched: 60 min"));
        assert!(text.contains("2 Cooking"));
        assert!(text.contains("Watched: 1 min"));
        assert!(!text.contains("<talks>"));
    }

    #[test]
    fn stats_text_for_finished_queue() {
        let stats = UserStats {
            playlist_count: 2,
            done_count: 3,
            done_sec: 360,
            pending_count: 0,
            pending_sec: 0,
        };
        let text = stats_text(&stats);

        assert!(text.contains("Playlists: 1"));
        assert!(text.contains("Time watched: 6 min"));
        assert!(text.contains("⬛⬛⬛⬛⬛⬛(100%)"));
    }

    #[test]
    fn stats_text_for_empty_queue() {
        let text = stats_text(&UserStats::default());

        // Count excludes the default playlist and never goes negative
        assert!(text.contains("Playlists: 0"));
        assert!(text.contains("⬛⬜⬜⬜⬜⬜(0%)"));
    }

    #[test]
    fn progress_blocks_quantize_at_thresholds() {
        assert_eq!(progress_blocks(100), "⬛⬛⬛⬛⬛⬛");
        assert_eq!(progress_blocks(99), "⬛⬛⬛⬛⬛⬜");
        assert_eq!(progress_blocks(80), "⬛⬛⬛⬛⬛⬜");
        assert_eq!(progress_blocks(79), "⬛⬛⬛⬛⬜⬜");
        assert_eq!(progress_blocks(60), "⬛⬛⬛⬛⬜⬜");
        assert_eq!(progress_blocks(40), "⬛⬛⬛⬜⬜⬜");
        assert_eq!(progress_blocks(20), "⬛⬛⬜⬜⬜⬜");
        assert_eq!(progress_blocks(19), "⬛⬜⬜⬜⬜⬜");
        assert_eq!(progress_blocks(0), "⬛⬜⬜⬜⬜⬜");
    }

    #[test]
    fn hours_minutes_formats() {
        assert_eq!(hours_minutes(0), "0 min");
        assert_eq!(hours_minutes(360), "6 min");
        assert_eq!(hours_minutes(3720), "1 h 2 min");
    }

    #[test]
    fn restart_text_covers_outcomes() {
        assert_eq!(
            restart_text(RestartOutcome::Restarted { items_reset: 3 }),
            "Playlist restarted.\nItems reset: 3."
        );
        assert_eq!(
            restart_text(RestartOutcome::ItemsReset { items_reset: 1 }),
            "Items reset: 1.\nPlaylist was already pending."
        );
        assert_eq!(restart_text(RestartOutcome::Unchanged), "Nothing to restart.");
    }

    #[test]
    fn deleted_text_escapes_title() {
        let text = deleted_text(&DeletedPlaylist {
            id: 7,
            title: Some("<b>bold</b>".to_string()),
            source_url: "https://youtube.com/playlist?list=PL1".to_string(),
        });
        assert!(text.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(text.starts_with("Deleted:\n7 "));
    }
}
