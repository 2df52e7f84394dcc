//! Domain types for the enrichment worker.
//!
//! - Episode: a published piece of catalog content, created upstream
//! - Transcript: the derived text appended by this worker

pub mod episode;
pub mod transcript;

// Re-export commonly used types
pub use episode::Episode;
pub use transcript::Transcript;
