//! aircheck - Radio episode enrichment worker
//!
//! A background worker that finds episodes in the station catalog which
//! have no derived text yet, produces a transcript and summary through an
//! AI provider, and appends the result to the transcripts table.
//!
//! # Architecture
//!
//! - Episodes are created upstream by catalog ingestion; this worker only
//!   reads them.
//! - Transcripts are insert-only. A uniqueness constraint per episode makes
//!   a second writer's insert a no-op instead of a duplicate row.
//! - Provider failures never stop the loop: HTTP-level failures become
//!   value-level fallback text inside the provider, transport failures are
//!   replaced per stage with local fallback text, and anything else aborts
//!   only the current cycle.
//!
//! # Modules
//!
//! - `provider`: AI capability abstraction (Azure OpenAI or local stand-in)
//! - `store`: SQLite access for episodes and transcripts
//! - `worker`: The enrichment loop and ingestion heartbeat
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Seed a demo catalog, then run the worker until Ctrl-C
//! aircheck seed
//! aircheck run
//!
//! # Execute a single cycle and exit
//! aircheck run --once
//!
//! # Show catalog / transcript counts
//! aircheck status
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod provider;
pub mod store;
pub mod worker;

// Re-export main types at crate root for convenience
pub use config::{AzureSettings, Settings};
pub use domain::{Episode, Transcript};
pub use provider::{select_provider, AiProvider, AzureProvider, LocalProvider, ProviderError};
pub use worker::{CycleOutcome, EnrichmentWorker};
