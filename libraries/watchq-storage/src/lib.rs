//! WatchQueue Storage
//!
//! `SQLite` persistence layer for WatchQueue.
//!
//! This crate owns the `users` / `playlists` / `playlist_items` schema
//! and every statement executed against it. Each feature is a vertical
//! slice owning its own queries.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = watchq_storage::create_pool("sqlite://watchq.db").await?;
//! watchq_storage::run_migrations(&pool).await?;
//!
//! let user_id = watchq_storage::users::ensure(&pool, 42, Some("alice")).await?;
//! let default_id = watchq_storage::playlists::ensure_default(&pool, user_id).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod items;
pub mod playlists;
pub mod stats;
pub mod users;

pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into the binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Called once on startup to bring the schema up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://watchq.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Item rows must go away with their playlist; the cascade only
        // fires when the pragma is on for the connection.
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
