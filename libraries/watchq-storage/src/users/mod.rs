//! User identity resolution
//!
//! Maps a Telegram identity to an internal user record, creating it on
//! first contact.

use crate::StorageError;
use sqlx::{Row, SqlitePool};
use watchq_core::types::UserId;

type Result<T> = std::result::Result<T, StorageError>;

/// Resolve a Telegram identity to an internal user id, creating the
/// record on first contact.
///
/// Idempotent: on conflict no columns change and the existing id is
/// fetched, so the stored username stays whatever was seen first.
pub async fn ensure(
    pool: &SqlitePool,
    telegram_id: i64,
    username: Option<&str>,
) -> Result<UserId> {
    let result = sqlx::query("INSERT OR IGNORE INTO users (telegram_id, username) VALUES (?, ?)")
        .bind(telegram_id)
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        return Ok(result.last_insert_rowid());
    }

    let row = sqlx::query("SELECT id FROM users WHERE telegram_id = ?")
        .bind(telegram_id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| r.get("id")).ok_or_else(|| {
        StorageError::Integrity(format!(
            "user upsert for telegram id {telegram_id} returned no id and the lookup found nothing"
        ))
    })
}

/// Look up a user by Telegram identity without creating one
pub async fn find_by_telegram_id(
    pool: &SqlitePool,
    telegram_id: i64,
) -> Result<Option<watchq_core::User>> {
    let row = sqlx::query("SELECT id, telegram_id, username FROM users WHERE telegram_id = ?")
        .bind(telegram_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| watchq_core::User {
        id: r.get("id"),
        telegram_id: r.get("telegram_id"),
        username: r.get("username"),
    }))
}
