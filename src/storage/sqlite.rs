//! SQLite-backed storage adapter
//!
//! Documents are stored as JSON blobs keyed by id, with a separate metadata
//! index table for listing and a capped revision log per document. Every
//! write runs in a transaction. Uses WAL mode for crash safety.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::config::MAX_REVISIONS;
use crate::error::Result;
use crate::model::{Cv, CvMetadata, Revision};
use crate::storage::StorageAdapter;

/// Create and initialize a database connection pool at the given path.
///
/// The parent directory is created if needed; the schema is applied before
/// the pool is handed out.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Creating database connection pool at: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    initialize_schema(&pool).await?;

    tracing::info!("Database pool created successfully");
    Ok(pool)
}

/// Apply the storage schema. Safe to call repeatedly.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metadata (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            template_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS revisions (
            id TEXT PRIMARY KEY,
            cv_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            data TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_revisions_cv ON revisions(cv_id, timestamp)")
        .execute(pool)
        .await?;

    Ok(())
}

/// SQLite storage adapter
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn get_cv(&self, id: &str) -> Result<Option<Cv>> {
        let data: Option<String> = sqlx::query_scalar("SELECT data FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(data) = data else {
            return Ok(None);
        };

        match serde_json::from_str::<Cv>(&data) {
            Ok(cv) => Ok(Some(cv)),
            Err(e) => {
                // A record that fails to decode reads as absent, not a crash.
                tracing::warn!("Discarding malformed document record {}: {}", id, e);
                Ok(None)
            }
        }
    }

    async fn put_cv(&self, cv: &Cv) -> Result<()> {
        let data = serde_json::to_string(cv)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, data) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(&cv.id)
        .bind(&data)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO metadata (id, name, template_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                template_id = excluded.template_id,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&cv.id)
        .bind(&cv.name)
        .bind(&cv.template_id)
        .bind(cv.created_at)
        .bind(cv.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Persisted CV: {}", cv.id);
        Ok(())
    }

    async fn delete_cv(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM metadata WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM revisions WHERE cv_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Deleted CV and revision log: {}", id);
        Ok(())
    }

    async fn list_metadata(&self) -> Result<Vec<CvMetadata>> {
        let entries = sqlx::query_as::<_, CvMetadata>(
            "SELECT id, name, template_id, created_at, updated_at FROM metadata",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn list_revisions(&self, cv_id: &str) -> Result<Vec<Revision>> {
        let rows = sqlx::query(
            r#"
            SELECT id, cv_id, timestamp, data FROM revisions
            WHERE cv_id = ?
            ORDER BY timestamp DESC, rowid DESC
            "#,
        )
        .bind(cv_id)
        .fetch_all(&self.pool)
        .await?;

        let mut revisions = Vec::with_capacity(rows.len());
        for row in rows {
            let data: String = row.get("data");
            match serde_json::from_str::<Cv>(&data) {
                Ok(cv) => revisions.push(Revision {
                    id: row.get("id"),
                    cv_id: row.get("cv_id"),
                    timestamp: row.get::<DateTime<Utc>, _>("timestamp"),
                    data: cv,
                }),
                Err(e) => {
                    tracing::warn!("Skipping malformed revision for {}: {}", cv_id, e);
                }
            }
        }

        Ok(revisions)
    }

    async fn append_revision(&self, revision: &Revision) -> Result<()> {
        let data = serde_json::to_string(&revision.data)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO revisions (id, cv_id, timestamp, data) VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                cv_id = excluded.cv_id,
                timestamp = excluded.timestamp,
                data = excluded.data
            "#,
        )
        .bind(&revision.id)
        .bind(&revision.cv_id)
        .bind(revision.timestamp)
        .bind(&data)
        .execute(&mut *tx)
        .await?;

        // Truncate to the newest MAX_REVISIONS entries; the overflow is
        // evicted silently.
        sqlx::query(
            r#"
            DELETE FROM revisions
            WHERE cv_id = ?1 AND id NOT IN (
                SELECT id FROM revisions
                WHERE cv_id = ?1
                ORDER BY timestamp DESC, rowid DESC
                LIMIT ?2
            )
            "#,
        )
        .bind(&revision.cv_id)
        .bind(MAX_REVISIONS as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Appended revision {} for CV {}", revision.id, revision.cv_id);
        Ok(())
    }

    async fn clear_revisions(&self, cv_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM revisions WHERE cv_id = ?")
            .bind(cv_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
