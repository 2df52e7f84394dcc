//! AI provider interfaces for transcription and summarization.
//!
//! Providers implement a single capability contract with two operations.
//! The concrete implementation is chosen once at startup from the settings;
//! per-call fallback between providers does not happen.

pub mod azure;
pub mod local;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Settings;

// Re-export the provider implementations
pub use azure::AzureProvider;
pub use local::LocalProvider;

/// Transport-level failures from a provider call.
///
/// HTTP-level non-success is *not* represented here: the Azure provider
/// turns it into fallback text so it surfaces in the persisted transcript
/// rather than as an error.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The HTTP response body could not be parsed as expected JSON.
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(e.to_string())
        }
    }
}

/// Trait for AI enrichment providers.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn AiProvider>` between the worker and tests.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Human-readable provider name (for logs)
    fn name(&self) -> &str;

    /// Produce transcript text for an audio source identifier
    async fn transcribe(&self, source: &str) -> Result<String, ProviderError>;

    /// Produce a summary of transcript text
    async fn summarize(&self, transcript: &str) -> Result<String, ProviderError>;
}

/// Choose the provider implementation from the settings, once at startup.
///
/// The Azure provider is used whenever its credentials (endpoint, key,
/// deployment) are complete. The `use_azure_ai` flag requests remote mode
/// but cannot force it without credentials; missing credentials fall back
/// to the local provider with a warning.
pub fn select_provider(settings: &Settings) -> Result<Arc<dyn AiProvider>> {
    if settings.azure.is_configured() {
        info!(deployment = %settings.azure.deployment, "using Azure OpenAI provider");
        return Ok(Arc::new(AzureProvider::new(settings.azure.clone())?));
    }

    if settings.use_azure_ai {
        warn!("remote AI requested but Azure credentials are incomplete; using local provider");
    } else {
        info!("using local provider");
    }
    Ok(Arc::new(LocalProvider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AzureSettings;

    fn remote_settings() -> Settings {
        Settings {
            azure: AzureSettings {
                endpoint: "https://example.openai.azure.com".to_string(),
                api_key: "key".to_string(),
                deployment: "gpt-4o-mini".to_string(),
                ..AzureSettings::default()
            },
            ..Settings::default()
        }
    }

    #[test]
    fn test_selects_azure_when_configured() {
        let provider = select_provider(&remote_settings()).unwrap();
        assert_eq!(provider.name(), "azure-openai");
    }

    #[test]
    fn test_selects_azure_without_flag() {
        // Complete credentials alone enable remote mode
        let mut settings = remote_settings();
        settings.use_azure_ai = false;
        assert_eq!(select_provider(&settings).unwrap().name(), "azure-openai");
    }

    #[test]
    fn test_flag_without_credentials_selects_local() {
        let settings = Settings {
            use_azure_ai: true,
            ..Settings::default()
        };
        assert_eq!(select_provider(&settings).unwrap().name(), "local");
    }

    #[test]
    fn test_selects_local_by_default() {
        assert_eq!(select_provider(&Settings::default()).unwrap().name(), "local");
    }
}
