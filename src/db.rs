use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::warn;

use crate::error::StoreError;
use crate::storage::KvStore;

/// SQLite-backed [`KvStore`]: one `kv` table, same string keys and values
/// as the browser storage the data originally lived in.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    quota: Option<usize>,
}

impl SqliteStore {
    pub async fn open(path: &Path, quota: Option<usize>) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect to sqlite")?;

        Self::from_pool(pool, quota).await
    }

    /// Private in-memory database, mostly for tests.
    pub async fn in_memory(quota: Option<usize>) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("open in-memory sqlite")?;
        Self::from_pool(pool, quota).await
    }

    pub async fn from_pool(pool: SqlitePool, quota: Option<usize>) -> anyhow::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("create kv table")?;

        Ok(Self { pool, quota })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    // SQLITE_FULL
    let full = e
        .as_database_error()
        .and_then(|d| d.code())
        .map(|c| c == "13")
        .unwrap_or(false);
    if full {
        warn!(error = %e, "sqlite reports disk full");
        StoreError::Exhausted
    } else {
        StoreError::from(e)
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(v,)| v))
    }

    /// Quota check and upsert run as one statement; it takes the write lock
    /// before reading, so concurrent writers wait on the busy timeout.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let quota = self.quota.map(|q| q as i64);
        let size = (key.len() + value.len()) as i64;

        let result = sqlx::query(
            r#"
            INSERT INTO kv (key, value)
            SELECT ?, ?
            WHERE ? IS NULL
               OR (SELECT COALESCE(SUM(length(CAST(key AS BLOB))
                                     + length(CAST(value AS BLOB))), 0)
                   FROM kv WHERE key != ?) + ? <= ?
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(quota)
        .bind(key)
        .bind(size)
        .bind(quota)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Exhausted);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
