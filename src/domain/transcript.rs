//! Derived text for an episode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transcript and summary produced for one episode.
///
/// Rows are insert-only: created once by a successful enrichment cycle and
/// never updated or deleted by the worker. At most one transcript exists
/// per episode, enforced by a uniqueness constraint on `episode_guid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique transcript ID
    pub guid: Uuid,

    /// Episode this transcript belongs to
    pub episode_guid: Uuid,

    /// Full transcript text
    pub full_text: Option<String>,

    /// Short summary of the transcript
    pub summary: Option<String>,

    /// When the row was written
    pub created_at: DateTime<Utc>,
}
