//! Playlist item queries

use sqlx::{Row, SqlitePool};
use watchq_core::types::{
    ItemId, ItemStatus, NewItem, NextItem, PlaylistId, PlaylistItem, UserId,
};

use crate::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Append one item to a playlist and bump the playlist's cumulative
/// duration. Returns the assigned position.
///
/// The duration update runs first so the transaction takes the write
/// lock before reading the max position; concurrent adds to the same
/// database serialize instead of computing the same position twice.
pub async fn add(pool: &SqlitePool, playlist_id: PlaylistId, item: &NewItem) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let bumped = sqlx::query(
        "UPDATE playlists SET total_duration_sec = total_duration_sec + ? WHERE id = ?",
    )
    .bind(item.duration_sec.unwrap_or(0))
    .bind(playlist_id)
    .execute(&mut *tx)
    .await?;

    if bumped.rows_affected() == 0 {
        return Err(StorageError::not_found("playlist", playlist_id));
    }

    let row = sqlx::query(
        "SELECT COALESCE(MAX(position), 0) + 1 AS next_pos FROM playlist_items WHERE playlist_id = ?",
    )
    .bind(playlist_id)
    .fetch_one(&mut *tx)
    .await?;
    let next_pos: i64 = row.get("next_pos");

    sqlx::query(
        r#"
        INSERT INTO playlist_items (playlist_id, position, title, url, duration_sec, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(playlist_id)
    .bind(next_pos)
    .bind(&item.title)
    .bind(&item.url)
    .bind(item.duration_sec)
    .bind(ItemStatus::Pending.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(next_pos)
}

/// The single next pending item of a playlist, scoped to its owner.
///
/// Ordering is deterministic: position ascending with nulls first
/// (SQLite's default ASC placement), then id ascending. Re-querying
/// without mutation returns the same item.
pub async fn find_next_pending(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<Option<NextItem>> {
    let row = sqlx::query(
        r#"
        SELECT pit.id, pit.url, pit.title
        FROM playlist_items pit
        JOIN playlists p ON p.id = pit.playlist_id
        WHERE pit.playlist_id = ? AND p.user_id = ? AND pit.status = ?
        ORDER BY pit.position, pit.id
        LIMIT 1
        "#,
    )
    .bind(playlist_id)
    .bind(user_id)
    .bind(ItemStatus::Pending.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| NextItem {
        id: r.get("id"),
        url: r.get("url"),
        title: r.get("title"),
    }))
}

/// Mark one item done and stamp its completion time, but only when it
/// belongs to the given playlist and that playlist belongs to the given
/// user. Returns whether a row changed.
pub async fn mark_done(
    pool: &SqlitePool,
    item_id: ItemId,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE playlist_items
        SET status = ?, completed_at = datetime('now')
        WHERE id = ? AND playlist_id = ?
          AND EXISTS (
              SELECT 1 FROM playlists p
              WHERE p.id = playlist_items.playlist_id AND p.user_id = ?
          )
        "#,
    )
    .bind(ItemStatus::Done.as_str())
    .bind(item_id)
    .bind(playlist_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All items of a playlist in serving order, scoped to the owner
pub async fn list(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<Vec<PlaylistItem>> {
    let rows = sqlx::query(
        r#"
        SELECT pit.id, pit.playlist_id, pit.position, pit.title, pit.url,
               pit.duration_sec, pit.status, pit.completed_at
        FROM playlist_items pit
        JOIN playlists p ON p.id = pit.playlist_id
        WHERE pit.playlist_id = ? AND p.user_id = ?
        ORDER BY pit.position, pit.id
        "#,
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistItem {
            id: row.get("id"),
            playlist_id: row.get("playlist_id"),
            position: row.get("position"),
            title: row.get("title"),
            url: row.get("url"),
            duration_sec: row.get("duration_sec"),
            status: ItemStatus::parse(row.get::<Option<String>, _>("status").as_deref()),
            completed_at: row.get("completed_at"),
        })
        .collect())
}
