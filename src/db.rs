//! SQLite connection pool for the scheme repository.
//!
//! The scheme table is small (tens of rows) and read-heavy: chat requests
//! fetch the active schemes on every message, while writes happen only
//! through the seeding path. WAL mode lets those reads proceed alongside
//! the occasional seed, and a handful of pooled connections covers the
//! concurrency the API sees.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::DbConfig;

/// Open the scheme database, creating the file and its parent directories
/// on first use so `sahayak init` works from a fresh checkout.
pub async fn connect(config: &DbConfig) -> Result<SqlitePool> {
    if let Some(parent) = config.path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_file_and_parents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = DbConfig {
            path: tmp.path().join("nested/dir/sahayak.sqlite"),
        };

        let pool = connect(&config).await.unwrap();
        assert!(config.path.exists());

        // Reconnecting to an existing database is fine.
        pool.close().await;
        let pool = connect(&config).await.unwrap();
        pool.close().await;
    }
}
