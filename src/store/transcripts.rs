//! Transcript persistence (insert-only).
//!
//! No update or delete path exists. The uniqueness constraint on
//! `episode_guid` turns a concurrent double-write into an `AlreadyPresent`
//! outcome for the losing writer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::Transcript;

use super::{format_timestamp, parse_timestamp};

/// Result of appending a transcript row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new row was written
    Inserted,

    /// The episode already has a transcript; nothing was written
    AlreadyPresent,
}

/// Append one transcript row for an episode.
pub async fn append(
    pool: &SqlitePool,
    episode_guid: Uuid,
    full_text: &str,
    summary: &str,
    created_at: DateTime<Utc>,
) -> Result<AppendOutcome> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO transcripts (guid, episode_guid, full_text, summary, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(episode_guid.to_string())
    .bind(full_text)
    .bind(summary)
    .bind(format_timestamp(created_at))
    .execute(pool)
    .await
    .context("Failed to append transcript")?;

    if result.rows_affected() == 0 {
        Ok(AppendOutcome::AlreadyPresent)
    } else {
        Ok(AppendOutcome::Inserted)
    }
}

/// Look up the transcript for an episode, if any
pub async fn for_episode(pool: &SqlitePool, episode_guid: Uuid) -> Result<Option<Transcript>> {
    let row = sqlx::query(
        r#"
        SELECT guid, episode_guid, full_text, summary, created_at
        FROM transcripts
        WHERE episode_guid = ?
        "#,
    )
    .bind(episode_guid.to_string())
    .fetch_optional(pool)
    .await
    .context("Failed to query transcript")?;

    row.map(|r| transcript_from_row(&r)).transpose()
}

/// Total number of transcript rows
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transcripts")
        .fetch_one(pool)
        .await
        .context("Failed to count transcripts")?;
    Ok(count)
}

fn transcript_from_row(row: &SqliteRow) -> Result<Transcript> {
    let guid: String = row.get("guid");
    let episode_guid: String = row.get("episode_guid");
    let created_at: String = row.get("created_at");

    Ok(Transcript {
        guid: Uuid::parse_str(&guid)
            .with_context(|| format!("Invalid transcript guid: {guid}"))?,
        episode_guid: Uuid::parse_str(&episode_guid)
            .with_context(|| format!("Invalid episode guid: {episode_guid}"))?,
        full_text: row.get("full_text"),
        summary: row.get("summary"),
        created_at: parse_timestamp(&created_at)?,
    })
}
