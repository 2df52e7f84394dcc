//! Episode catalog queries.
//!
//! The worker reads episodes and never mutates them; `insert` exists for
//! seeding demo data and for tests.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::Episode;

use super::{format_timestamp, parse_timestamp};

/// Insert one episode. Idempotent on the episode ID.
pub async fn insert(pool: &SqlitePool, episode: &Episode) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO episodes (guid, show_guid, title, audio_url, published_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(episode.guid.to_string())
    .bind(episode.show_guid.to_string())
    .bind(&episode.title)
    .bind(&episode.audio_url)
    .bind(format_timestamp(episode.published_at))
    .execute(pool)
    .await
    .context("Failed to insert episode")?;

    Ok(())
}

/// The next episode with no transcript: most recently published first,
/// equal publish times broken by episode ID ascending. Read-only; nothing
/// is reserved or locked.
pub async fn next_unprocessed(pool: &SqlitePool) -> Result<Option<Episode>> {
    let row = sqlx::query(
        r#"
        SELECT e.guid, e.show_guid, e.title, e.audio_url, e.published_at
        FROM episodes e
        WHERE NOT EXISTS (
            SELECT 1 FROM transcripts t WHERE t.episode_guid = e.guid
        )
        ORDER BY e.published_at DESC, e.guid ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
    .context("Failed to query for unprocessed episodes")?;

    row.map(|r| episode_from_row(&r)).transpose()
}

/// Total number of episodes in the catalog
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM episodes")
        .fetch_one(pool)
        .await
        .context("Failed to count episodes")?;
    Ok(count)
}

/// Number of episodes still lacking a transcript
pub async fn count_unprocessed(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM episodes e
        WHERE NOT EXISTS (
            SELECT 1 FROM transcripts t WHERE t.episode_guid = e.guid
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("Failed to count unprocessed episodes")?;
    Ok(count)
}

fn episode_from_row(row: &SqliteRow) -> Result<Episode> {
    let guid: String = row.get("guid");
    let show_guid: String = row.get("show_guid");
    let published_at: String = row.get("published_at");

    Ok(Episode {
        guid: Uuid::parse_str(&guid).with_context(|| format!("Invalid episode guid: {guid}"))?,
        show_guid: Uuid::parse_str(&show_guid)
            .with_context(|| format!("Invalid show guid: {show_guid}"))?,
        title: row.get("title"),
        audio_url: row.get("audio_url"),
        published_at: parse_timestamp(&published_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory_pool, transcripts};
    use chrono::{Duration, TimeZone, Utc};

    fn episode(title: &str, published_at: chrono::DateTime<Utc>) -> Episode {
        Episode {
            guid: Uuid::new_v4(),
            show_guid: Uuid::new_v4(),
            title: title.to_string(),
            audio_url: Some(format!("https://example.com/audio/{title}.mp3")),
            published_at,
        }
    }

    #[tokio::test]
    async fn test_next_unprocessed_prefers_newest() {
        let pool = memory_pool().await;
        let base = Utc.with_ymd_and_hms(2026, 2, 15, 9, 0, 0).unwrap();

        let older = episode("older", base);
        let newer = episode("newer", base + Duration::hours(2));
        insert(&pool, &older).await.unwrap();
        insert(&pool, &newer).await.unwrap();

        let next = next_unprocessed(&pool).await.unwrap().unwrap();
        assert_eq!(next.guid, newer.guid);
    }

    #[tokio::test]
    async fn test_tie_break_is_guid_ascending() {
        let pool = memory_pool().await;
        let at = Utc.with_ymd_and_hms(2026, 2, 15, 9, 0, 0).unwrap();

        let mut a = episode("a", at);
        let mut b = episode("b", at);
        a.guid = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
        b.guid = Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap();
        insert(&pool, &b).await.unwrap();
        insert(&pool, &a).await.unwrap();

        let next = next_unprocessed(&pool).await.unwrap().unwrap();
        assert_eq!(next.guid, a.guid);
    }

    #[tokio::test]
    async fn test_transcribed_episodes_are_skipped() {
        let pool = memory_pool().await;
        let base = Utc.with_ymd_and_hms(2026, 2, 15, 9, 0, 0).unwrap();

        let older = episode("older", base);
        let newer = episode("newer", base + Duration::hours(2));
        insert(&pool, &older).await.unwrap();
        insert(&pool, &newer).await.unwrap();

        transcripts::append(&pool, newer.guid, "text", "summary", Utc::now())
            .await
            .unwrap();

        let next = next_unprocessed(&pool).await.unwrap().unwrap();
        assert_eq!(next.guid, older.guid);
        assert_eq!(count_unprocessed(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_catalog_returns_none() {
        let pool = memory_pool().await;
        assert!(next_unprocessed(&pool).await.unwrap().is_none());
        assert_eq!(count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let pool = memory_pool().await;
        let mut ep = episode("round-trip", Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        ep.audio_url = None;
        insert(&pool, &ep).await.unwrap();

        let got = next_unprocessed(&pool).await.unwrap().unwrap();
        assert_eq!(got.guid, ep.guid);
        assert_eq!(got.show_guid, ep.show_guid);
        assert_eq!(got.title, ep.title);
        assert_eq!(got.audio_url, None);
        assert_eq!(got.published_at, ep.published_at);
    }
}
