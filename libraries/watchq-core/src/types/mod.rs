mod ids;
mod item;
mod playlist;
mod stats;
mod user;

pub use ids::{ItemId, PlaylistId, UserId};
pub use item::{ItemStatus, NewItem, NextItem, PlaylistItem};
pub use playlist::{
    DeletedPlaylist, NewPlaylist, Playlist, PlaylistOverview, PlaylistStatus, RestartOutcome,
    DEFAULT_PLAYLIST_SOURCE, DEFAULT_PLAYLIST_TITLE,
};
pub use stats::UserStats;
pub use user::User;
