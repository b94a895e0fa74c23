//! Aggregate statistics queries

use sqlx::{Row, SqlitePool};
use watchq_core::types::{ItemStatus, UserId, UserStats};

use crate::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Compute the user's watch statistics in one aggregate query.
///
/// `playlist_count` includes the default playlist; the presentation
/// layer subtracts it from the displayed count.
pub async fn for_user(pool: &SqlitePool, user_id: UserId) -> Result<UserStats> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM playlists p2 WHERE p2.user_id = ?1) AS playlist_count,
            COALESCE(SUM(CASE WHEN pit.status = ?2 THEN 1 END), 0) AS done_count,
            COALESCE(SUM(CASE WHEN pit.status = ?2 THEN pit.duration_sec END), 0) AS done_sec,
            COALESCE(SUM(CASE WHEN pit.status = ?3 THEN 1 END), 0) AS pending_count,
            COALESCE(SUM(CASE WHEN pit.status = ?3 THEN pit.duration_sec END), 0) AS pending_sec
        FROM playlists p
        JOIN playlist_items pit ON pit.playlist_id = p.id
        WHERE p.user_id = ?1
        "#,
    )
    .bind(user_id)
    .bind(ItemStatus::Done.as_str())
    .bind(ItemStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        playlist_count: row.get("playlist_count"),
        done_count: row.get("done_count"),
        done_sec: row.get("done_sec"),
        pending_count: row.get("pending_count"),
        pending_sec: row.get("pending_sec"),
    })
}
