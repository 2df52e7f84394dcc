//! Command-line interface.
//!
//! - `aircheck run [--once]` - run the enrichment worker
//! - `aircheck status` - show catalog and transcript counts
//! - `aircheck seed` - populate a small demo catalog

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::config::Settings;
use crate::domain::Episode;
use crate::provider::select_provider;
use crate::store::{self, episodes, transcripts};
use crate::worker::{heartbeat, EnrichmentWorker};

/// Radio episode enrichment worker
#[derive(Parser, Debug)]
#[command(name = "aircheck", version, about)]
pub struct Cli {
    /// Path to a YAML config file (env vars still take precedence)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the enrichment worker until interrupted
    Run {
        /// Execute a single enrichment cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Show catalog and transcript counts
    Status,

    /// Populate a small demo catalog (no-op when episodes already exist)
    Seed,
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref())?;

        match self.command {
            Commands::Run { once } => execute_run(settings, once).await,
            Commands::Status => execute_status(settings).await,
            Commands::Seed => execute_seed(settings).await,
        }
    }
}

/// Run the worker (and the ingestion heartbeat) until Ctrl-C
async fn execute_run(settings: Settings, once: bool) -> Result<()> {
    let pool = store::connect(&settings.database_path).await?;
    store::init_schema(&pool).await?;

    let provider = select_provider(&settings)?;
    let worker = EnrichmentWorker::new(
        pool.clone(),
        provider,
        Duration::from_secs(settings.poll_interval_secs),
    );

    let cancel = CancellationToken::new();

    if once {
        let outcome = worker.run_cycle(&cancel).await?;
        info!(?outcome, "single cycle finished");
        pool.close().await;
        return Ok(());
    }

    let heartbeat_handle = tokio::spawn(heartbeat::run(cancel.clone()));
    let worker_token = cancel.clone();
    let worker_handle = tokio::spawn(async move { worker.run(worker_token).await });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("shutdown signal received");
    cancel.cancel();

    worker_handle
        .await
        .context("Worker task panicked")??;
    heartbeat_handle
        .await
        .context("Heartbeat task panicked")?;

    pool.close().await;
    Ok(())
}

/// Print catalog / transcript counts and the effective configuration
async fn execute_status(settings: Settings) -> Result<()> {
    let pool = store::connect(&settings.database_path).await?;
    store::init_schema(&pool).await?;

    let total = episodes::count(&pool).await?;
    let pending = episodes::count_unprocessed(&pool).await?;
    let transcribed = transcripts::count(&pool).await?;

    println!();
    println!("aircheck status");
    println!("══════════════════════════════════════════════════════════════");
    println!();
    println!("Database:    {}", settings.database_path.display());
    println!(
        "Provider:    {}",
        if settings.azure.is_configured() {
            "azure-openai"
        } else {
            "local"
        }
    );
    println!("Interval:    {}s", settings.poll_interval_secs);
    println!();
    println!("Catalog:");
    println!("  Episodes:    {total}");
    println!("  Pending:     {pending}");
    println!("  Transcribed: {transcribed}");
    println!();

    pool.close().await;
    Ok(())
}

/// Seed a few demo episodes. Returns early when the catalog is non-empty.
async fn execute_seed(settings: Settings) -> Result<()> {
    let pool = store::connect(&settings.database_path).await?;
    store::init_schema(&pool).await?;

    if episodes::count(&pool).await? > 0 {
        println!("Catalog already has episodes; nothing to seed.");
        pool.close().await;
        return Ok(());
    }

    for episode in demo_episodes() {
        episodes::insert(&pool, &episode).await?;
        println!("Seeded: {}", episode.title);
    }

    pool.close().await;
    Ok(())
}

/// Demo catalog: two shows, three episodes with staggered publish times
fn demo_episodes() -> Vec<Episode> {
    let morning_show = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
    let drive_show = Uuid::parse_str("33333333-3333-3333-3333-333333333333").unwrap();
    let now = Utc::now();

    vec![
        Episode {
            guid: Uuid::parse_str("aaaaaaaa-0000-0000-0000-000000000001").unwrap(),
            show_guid: morning_show,
            title: "Morning Pulse - Episode 001".to_string(),
            audio_url: Some("https://example.com/audio/morning-pulse-001.mp3".to_string()),
            published_at: now - ChronoDuration::days(3),
        },
        Episode {
            guid: Uuid::parse_str("aaaaaaaa-0000-0000-0000-000000000002").unwrap(),
            show_guid: morning_show,
            title: "Morning Pulse - Episode 002".to_string(),
            audio_url: Some("https://example.com/audio/morning-pulse-002.mp3".to_string()),
            published_at: now - ChronoDuration::days(1),
        },
        Episode {
            guid: Uuid::parse_str("bbbbbbbb-0000-0000-0000-000000000001").unwrap(),
            show_guid: drive_show,
            title: "Drive Europa - Launch Special".to_string(),
            // No published audio yet; the title becomes the source
            audio_url: None,
            published_at: now - ChronoDuration::days(2),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_episodes_have_distinct_ids() {
        let eps = demo_episodes();
        assert_eq!(eps.len(), 3);
        let mut guids: Vec<Uuid> = eps.iter().map(|e| e.guid).collect();
        guids.sort();
        guids.dedup();
        assert_eq!(guids.len(), 3);
    }

    #[test]
    fn test_demo_episodes_newest_is_morning_002() {
        let eps = demo_episodes();
        let newest = eps
            .iter()
            .max_by_key(|e| e.published_at)
            .unwrap();
        assert_eq!(newest.title, "Morning Pulse - Episode 002");
    }
}
