/// Aggregate user statistics
use serde::{Deserialize, Serialize};

/// Watch statistics across all of a user's playlists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Total playlist count, including the default playlist
    pub playlist_count: i64,

    /// Items marked done
    pub done_count: i64,

    /// Summed duration of done items, in seconds
    pub done_sec: i64,

    /// Items still pending
    pub pending_count: i64,

    /// Summed duration of pending items, in seconds
    pub pending_sec: i64,
}

impl UserStats {
    /// Completion percentage by watch time, truncated to an integer.
    ///
    /// Zero when there is nothing queued at all.
    pub fn done_percentage(&self) -> i64 {
        let total = self.done_sec + self.pending_sec;
        if total > 0 {
            self.done_sec * 100 / total
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_truncates() {
        let stats = UserStats {
            done_sec: 100,
            pending_sec: 200,
            ..Default::default()
        };
        assert_eq!(stats.done_percentage(), 33);
    }

    #[test]
    fn percentage_zero_when_empty() {
        assert_eq!(UserStats::default().done_percentage(), 0);
    }
}
