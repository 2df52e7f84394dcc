//! SQLite access for the episode catalog and transcripts.
//!
//! The catalog schema is owned by upstream ingestion; the worker only needs
//! the two tables below and bootstraps them when they are missing so `run`,
//! `seed`, and the tests work against a fresh database.
//!
//! Timestamps are stored as fixed-width RFC 3339 text (microseconds, `Z`
//! suffix) so lexicographic `ORDER BY` matches chronological order.

pub mod episodes;
pub mod transcripts;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open (or create) the database at `path`.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))?;

    Ok(pool)
}

/// Create the worker's tables when they do not exist yet.
///
/// `transcripts.episode_guid` is UNIQUE: a second writer racing on the same
/// episode inserts nothing instead of producing a duplicate row.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS episodes (
            guid TEXT PRIMARY KEY,
            show_guid TEXT NOT NULL,
            title TEXT NOT NULL,
            audio_url TEXT,
            published_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create episodes table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcripts (
            guid TEXT PRIMARY KEY,
            episode_guid TEXT NOT NULL UNIQUE REFERENCES episodes(guid),
            full_text TEXT,
            summary TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create transcripts table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_episodes_published_at ON episodes(published_at DESC)",
    )
    .execute(pool)
    .await
    .context("Failed to create episode publish-time index")?;

    Ok(())
}

/// Format a timestamp for storage
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid stored timestamp: {raw}"))?;
    Ok(parsed.with_timezone(&Utc))
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One connection, so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
