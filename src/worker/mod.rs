//! The enrichment loop.
//!
//! One cycle: select the next episode without a transcript, transcribe,
//! summarize, append the transcript row, then sleep the poll interval.
//! Two nested failure-handling layers keep the loop alive:
//!
//! - per stage: a failed provider call is replaced with local fallback text
//!   and the cycle continues to persistence;
//! - per cycle: a selection or persistence failure is logged and aborts the
//!   current cycle only; the next cycle starts after the normal sleep.
//!
//! The cancellation token is checked at loop top, raced against every await
//! inside the cycle, and raced against the sleep. Cancellation between the
//! provider calls and the insert loses that cycle's work; the episode is
//! still unprocessed and gets picked up again on a later run.

pub mod heartbeat;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::provider::AiProvider;
use crate::store::transcripts::AppendOutcome;
use crate::store::{episodes, transcripts};

/// Transcript text substituted when the provider's transcribe call fails
pub fn fallback_transcript(source: &str) -> String {
    format!("[LOCAL-FALLBACK-TRANSCRIPT] Source={source}")
}

/// Summary text substituted when the provider's summarize call fails
pub const FALLBACK_SUMMARY: &str = "[LOCAL-FALLBACK-SUMMARY] Summary unavailable for this episode.";

/// What one cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A transcript row was written for this episode
    Processed(Uuid),

    /// The selected episode gained a transcript between selection and
    /// insert (another worker instance won the race)
    AlreadyProcessed(Uuid),

    /// Every episode already has a transcript
    NothingToDo,

    /// Cancellation was observed before the cycle finished
    Cancelled,
}

/// Background worker that enriches episodes on a fixed cadence
pub struct EnrichmentWorker {
    db: SqlitePool,
    provider: Arc<dyn AiProvider>,
    poll_interval: Duration,
}

impl EnrichmentWorker {
    pub fn new(db: SqlitePool, provider: Arc<dyn AiProvider>, poll_interval: Duration) -> Self {
        Self {
            db,
            provider,
            poll_interval,
        }
    }

    /// Run cycles until the token is cancelled.
    ///
    /// Cycles never overlap: the next one starts only after the previous
    /// cycle and the following sleep have completed.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        info!(
            provider = self.provider.name(),
            interval_secs = self.poll_interval.as_secs(),
            "enrichment worker started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            // Whole-cycle guard: selection or persistence failures end the
            // cycle early without stopping the worker.
            match self.run_cycle(&cancel).await {
                Ok(CycleOutcome::Cancelled) => break,
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "enrichment cycle failed; retrying after the poll interval");
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("enrichment worker stopped");
        Ok(())
    }

    /// Execute one select → transcribe → summarize → append cycle.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleOutcome> {
        let episode = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(CycleOutcome::Cancelled),
            found = episodes::next_unprocessed(&self.db) => found?,
        };

        let Some(episode) = episode else {
            info!("no unprocessed episodes");
            return Ok(CycleOutcome::NothingToDo);
        };

        let source = episode.transcription_source().to_string();
        info!(episode = %episode.guid, title = %episode.title, "enriching episode");

        let full_text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(CycleOutcome::Cancelled),
            result = self.provider.transcribe(&source) => match result {
                Ok(text) => text,
                Err(e) => {
                    warn!(episode = %episode.guid, error = %e, "transcribe failed; using local fallback text");
                    fallback_transcript(&source)
                }
            },
        };

        let summary = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(CycleOutcome::Cancelled),
            result = self.provider.summarize(&full_text) => match result {
                Ok(text) => text,
                Err(e) => {
                    warn!(episode = %episode.guid, error = %e, "summarize failed; using local fallback summary");
                    FALLBACK_SUMMARY.to_string()
                }
            },
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(CycleOutcome::Cancelled),
            result = transcripts::append(&self.db, episode.guid, &full_text, &summary, Utc::now()) => result?,
        };

        match outcome {
            AppendOutcome::Inserted => {
                info!(episode = %episode.guid, "transcript stored");
                Ok(CycleOutcome::Processed(episode.guid))
            }
            AppendOutcome::AlreadyPresent => {
                debug!(episode = %episode.guid, "transcript already present; treating as done");
                Ok(CycleOutcome::AlreadyProcessed(episode.guid))
            }
        }
    }
}
