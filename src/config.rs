//! Worker configuration.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (AZURE_OPENAI_*, USE_AZURE_AI, AIRCHECK_*)
//! 2. Optional YAML config file passed via `--config`
//! 3. Defaults (~/.aircheck/aircheck.db, 20 second poll interval)
//!
//! Settings are loaded once at startup and passed explicitly into the
//! provider factory and worker constructors; there is no global lookup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default API version for the Azure OpenAI chat-completions endpoint.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Default seconds between enrichment cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Path to the SQLite database file
    pub database: Option<String>,
    /// Seconds between enrichment cycles
    pub poll_interval_secs: Option<u64>,
    /// Request remote AI enrichment
    pub use_azure_ai: Option<bool>,
    #[serde(default)]
    pub azure: AzureConfigFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AzureConfigFile {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment: Option<String>,
    pub api_version: Option<String>,
}

/// Azure OpenAI connection settings.
#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl AzureSettings {
    /// Remote configuration counts as present only when endpoint, key, and
    /// deployment are all non-empty. The API version always has a default.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.deployment.trim().is_empty()
    }
}

/// Resolved worker settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Seconds between enrichment cycles
    pub poll_interval_secs: u64,
    /// Remote AI enrichment requested (credentials still required)
    pub use_azure_ai: bool,
    /// Azure OpenAI connection settings
    pub azure: AzureSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            use_azure_ai: false,
            azure: AzureSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, then the optional config file, then
    /// environment variable overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = config_path {
            let file = load_config_file(path)?;
            settings.apply_file(file);
        }

        settings.apply_env();
        Ok(settings)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(database) = file.database {
            self.database_path = PathBuf::from(database);
        }
        if let Some(interval) = file.poll_interval_secs {
            self.poll_interval_secs = interval;
        }
        if let Some(use_azure) = file.use_azure_ai {
            self.use_azure_ai = use_azure;
        }
        if let Some(endpoint) = file.azure.endpoint {
            self.azure.endpoint = endpoint;
        }
        if let Some(api_key) = file.azure.api_key {
            self.azure.api_key = api_key;
        }
        if let Some(deployment) = file.azure.deployment {
            self.azure.deployment = deployment;
        }
        if let Some(api_version) = file.azure.api_version {
            self.azure.api_version = api_version;
        }
    }

    fn apply_env(&mut self) {
        if let Some(database) = env_non_empty("AIRCHECK_DATABASE") {
            self.database_path = PathBuf::from(database);
        }
        if let Some(interval) = env_non_empty("AIRCHECK_POLL_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.poll_interval_secs = secs;
            }
        }
        if let Some(flag) = env_non_empty("USE_AZURE_AI") {
            self.use_azure_ai = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        if let Some(endpoint) = env_non_empty("AZURE_OPENAI_ENDPOINT") {
            self.azure.endpoint = endpoint;
        }
        if let Some(api_key) = env_non_empty("AZURE_OPENAI_API_KEY") {
            self.azure.api_key = api_key;
        }
        if let Some(deployment) = env_non_empty("AZURE_OPENAI_DEPLOYMENT") {
            self.azure.deployment = deployment;
        }
        if let Some(api_version) = env_non_empty("AZURE_OPENAI_API_VERSION") {
            self.azure.api_version = api_version;
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Default database location (~/.aircheck/aircheck.db)
fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aircheck")
        .join("aircheck.db")
}

/// Load and parse a config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
