//! Episode catalog entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published episode eligible for text enrichment.
///
/// Episodes are created by catalog ingestion; the worker never updates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Unique episode ID
    pub guid: Uuid,

    /// Owning show ID (shows are managed upstream)
    pub show_guid: Uuid,

    /// Episode title
    pub title: String,

    /// Audio locator, when the episode has published audio
    pub audio_url: Option<String>,

    /// When the episode was published
    pub published_at: DateTime<Utc>,
}

impl Episode {
    /// The identifier handed to the transcription provider: the audio URL
    /// when present, otherwise the title.
    pub fn transcription_source(&self) -> &str {
        self.audio_url.as_deref().unwrap_or(&self.title)
    }
}
