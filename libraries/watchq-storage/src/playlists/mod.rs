//! Playlist queries
//!
//! Everything is scoped by (playlist id, owning user id) so one user can
//! never read or mutate another user's queues.

use sqlx::{Row, SqlitePool};
use watchq_core::types::{
    DeletedPlaylist, NewItem, NewPlaylist, Playlist, PlaylistId, PlaylistOverview, PlaylistStatus,
    RestartOutcome, UserId, DEFAULT_PLAYLIST_SOURCE, DEFAULT_PLAYLIST_TITLE,
};
use watchq_core::ItemStatus;

use crate::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Get or create the user's implicit default playlist.
///
/// Idempotent: the (user, source) uniqueness constraint makes the
/// insert a no-op when the row already exists, and the existing id is
/// fetched instead.
pub async fn ensure_default(pool: &SqlitePool, user_id: UserId) -> Result<PlaylistId> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO playlists (user_id, source_url, title, total_duration_sec, status)
        VALUES (?, ?, ?, 0, ?)
        "#,
    )
    .bind(user_id)
    .bind(DEFAULT_PLAYLIST_SOURCE)
    .bind(DEFAULT_PLAYLIST_TITLE)
    .bind(PlaylistStatus::Pending.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(result.last_insert_rowid());
    }

    let row = sqlx::query("SELECT id FROM playlists WHERE user_id = ? AND source_url = ? LIMIT 1")
        .bind(user_id)
        .bind(DEFAULT_PLAYLIST_SOURCE)
        .fetch_optional(pool)
        .await?;

    row.map(|r| r.get("id")).ok_or_else(|| {
        StorageError::Integrity(format!(
            "default playlist upsert for user {user_id} returned no id and the lookup found nothing"
        ))
    })
}

/// Save a playlist together with all of its items in one transaction.
///
/// Returns `None` when the user already saved this source URL; no items
/// are inserted in that case.
pub async fn create_with_items(
    pool: &SqlitePool,
    user_id: UserId,
    playlist: &NewPlaylist,
    items: &[NewItem],
) -> Result<Option<PlaylistId>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO playlists (user_id, source_url, title, total_duration_sec, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&playlist.source_url)
    .bind(&playlist.title)
    .bind(playlist.total_duration_sec)
    .bind(PlaylistStatus::Pending.as_str())
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    let playlist_id = result.last_insert_rowid();

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO playlist_items (playlist_id, position, title, url, duration_sec, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(playlist_id)
        .bind(item.position)
        .bind(&item.title)
        .bind(&item.url)
        .bind(item.duration_sec)
        .bind(ItemStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Some(playlist_id))
}

/// Get a playlist by id, scoped to its owner
pub async fn get(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, source_url, title, total_duration_sec, status,
               created_at, last_served_at, completed_at
        FROM playlists
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Playlist {
        id: row.get("id"),
        user_id: row.get("user_id"),
        source_url: row.get("source_url"),
        title: row.get("title"),
        total_duration_sec: row.get("total_duration_sec"),
        status: PlaylistStatus::parse(row.get::<Option<String>, _>("status").as_deref()),
        created_at: row.get("created_at"),
        last_served_at: row.get("last_served_at"),
        completed_at: row.get("completed_at"),
    }))
}

/// Mark a playlist done, but only when it has at least one item and
/// none of them is still pending.
///
/// Returns whether a row matched. The first completion time is kept on
/// repeated calls.
pub async fn mark_done_if_finished(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET status = ?, completed_at = COALESCE(completed_at, datetime('now'))
        WHERE id = ? AND user_id = ?
          AND EXISTS (
              SELECT 1 FROM playlist_items pit WHERE pit.playlist_id = playlists.id
          )
          AND NOT EXISTS (
              SELECT 1 FROM playlist_items pit
              WHERE pit.playlist_id = playlists.id AND pit.status = ?
          )
        "#,
    )
    .bind(PlaylistStatus::Done.as_str())
    .bind(id)
    .bind(user_id)
    .bind(ItemStatus::Pending.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Flip a done playlist back to pending after a new item landed in it.
///
/// No-op unless the playlist actually has a pending item.
pub async fn reopen_if_has_pending(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE playlists
        SET status = ?, completed_at = NULL
        WHERE id = ? AND user_id = ? AND status <> ?
          AND EXISTS (
              SELECT 1 FROM playlist_items pit
              WHERE pit.playlist_id = playlists.id AND pit.status = ?
          )
        "#,
    )
    .bind(PlaylistStatus::Pending.as_str())
    .bind(id)
    .bind(user_id)
    .bind(PlaylistStatus::Pending.as_str())
    .bind(ItemStatus::Pending.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Stamp the playlist's last-served time to now
pub async fn touch_last_served(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<bool> {
    let result =
        sqlx::query("UPDATE playlists SET last_served_at = datetime('now') WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Reset a playlist: every non-pending item is reopened and its
/// completion time cleared, then the playlist row itself is reset
/// unless it was already pending. Runs as one transaction.
pub async fn restart(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<RestartOutcome> {
    let mut tx = pool.begin().await?;

    let items = sqlx::query(
        r#"
        UPDATE playlist_items
        SET status = ?, completed_at = NULL
        WHERE playlist_id = ? AND status <> ?
          AND EXISTS (
              SELECT 1 FROM playlists p
              WHERE p.id = playlist_items.playlist_id AND p.user_id = ?
          )
        "#,
    )
    .bind(ItemStatus::Pending.as_str())
    .bind(id)
    .bind(ItemStatus::Pending.as_str())
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    let items_reset = items.rows_affected();

    let playlist = sqlx::query(
        r#"
        UPDATE playlists
        SET status = ?, completed_at = NULL, last_served_at = NULL
        WHERE id = ? AND user_id = ? AND status <> ?
        "#,
    )
    .bind(PlaylistStatus::Pending.as_str())
    .bind(id)
    .bind(user_id)
    .bind(PlaylistStatus::Pending.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(match (playlist.rows_affected() > 0, items_reset) {
        (true, n) => RestartOutcome::Restarted { items_reset: n },
        (false, 0) => RestartOutcome::Unchanged,
        (false, n) => RestartOutcome::ItemsReset { items_reset: n },
    })
}

/// Delete a playlist, refusing the default one.
///
/// Returns the deleted identity for confirmation messaging, or `None`
/// when there was nothing to delete. Items go away via the cascade.
pub async fn delete(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<Option<DeletedPlaylist>> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        SELECT id, title, source_url
        FROM playlists
        WHERE id = ? AND user_id = ? AND source_url <> ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(DEFAULT_PLAYLIST_SOURCE)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Some(DeletedPlaylist {
        id: row.get("id"),
        title: row.get("title"),
        source_url: row.get("source_url"),
    }))
}

/// Translate a 1-based display position into a playlist id.
///
/// Display positions run over the user's non-default playlists in
/// insertion order, matching [`overview`]. Out-of-range input yields
/// `None`, never an error.
pub async fn resolve_position(
    pool: &SqlitePool,
    user_id: UserId,
    position: i64,
) -> Result<Option<PlaylistId>> {
    if position < 1 {
        return Ok(None);
    }

    let row = sqlx::query(
        r#"
        SELECT id FROM playlists
        WHERE user_id = ? AND source_url <> ?
        ORDER BY id
        LIMIT 1 OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(DEFAULT_PLAYLIST_SOURCE)
    .bind(position - 1)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get("id")))
}

/// Pick one of the user's playlists that still has a pending item,
/// uniformly at random
pub async fn pick_random_ready(
    pool: &SqlitePool,
    user_id: UserId,
) -> Result<Option<PlaylistId>> {
    let row = sqlx::query(
        r#"
        SELECT p.id FROM playlists p
        WHERE p.user_id = ?
          AND EXISTS (
              SELECT 1 FROM playlist_items pit
              WHERE pit.playlist_id = p.id AND pit.status = ?
          )
        ORDER BY RANDOM()
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(ItemStatus::Pending.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get("id")))
}

/// The user-facing listing: non-default playlists in insertion order,
/// numbered from 1, with watched seconds per playlist
pub async fn overview(pool: &SqlitePool, user_id: UserId) -> Result<Vec<PlaylistOverview>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.title, p.source_url, p.status,
               COALESCE(SUM(CASE WHEN pit.status = ? THEN pit.duration_sec END), 0) AS watched_sec
        FROM playlists p
        LEFT JOIN playlist_items pit ON pit.playlist_id = p.id
        WHERE p.user_id = ? AND p.source_url <> ?
        GROUP BY p.id, p.title, p.source_url, p.status
        ORDER BY p.id
        "#,
    )
    .bind(ItemStatus::Done.as_str())
    .bind(user_id)
    .bind(DEFAULT_PLAYLIST_SOURCE)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| PlaylistOverview {
            id: row.get("id"),
            number: i as i64 + 1,
            title: row.get("title"),
            source_url: row.get("source_url"),
            status: PlaylistStatus::parse(row.get::<Option<String>, _>("status").as_deref()),
            watched_sec: row.get("watched_sec"),
        })
        .collect())
}
