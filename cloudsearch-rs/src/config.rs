//! Client settings, loaded from `config.toml` with environment overrides.

use crate::error::{CloudSearchError, Result};
use crate::query::condition::Condition;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `search_id`.
pub const ENV_SEARCH_ID: &str = "CLOUDSEARCH_ID";
/// Environment variable overriding `api_version`.
pub const ENV_API_VERSION: &str = "CLOUDSEARCH_API_VERSION";

pub const DEFAULT_API_VERSION: &str = "2011-02-01";
pub const DEFAULT_MAX_BATCH_BYTES: usize = 5 * 1024 * 1024;

/// Settings for one search domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSearchSettings {
    /// Domain suffix: requests go to `search-<id>` and `doc-<id>`.
    pub search_id: String,
    pub api_version: String,
    pub scheme: String,
    pub timeout_secs: u64,
    /// Ceiling for the serialized size of one document batch.
    pub max_batch_bytes: usize,
    /// `lang` attribute written on add actions.
    pub lang: String,
    /// Conditions appended to every search.
    pub persistent_conditions: Vec<Condition>,
}

impl Default for CloudSearchSettings {
    fn default() -> Self {
        Self {
            search_id: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            scheme: "http".to_string(),
            timeout_secs: 30,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            lang: "en".to_string(),
            persistent_conditions: Vec::new(),
        }
    }
}

impl CloudSearchSettings {
    pub fn new(search_id: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            search_id: search_id.into(),
            api_version: api_version.into(),
            ..Self::default()
        }
    }

    pub fn with_persistent_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.persistent_conditions.push(condition.into());
        self
    }

    /// `<scheme>://search-<id>/<api_version>/search`
    pub fn search_uri(&self) -> String {
        format!(
            "{}://search-{}/{}/search",
            self.scheme, self.search_id, self.api_version
        )
    }

    /// `<scheme>://doc-<id>/<api_version>/documents/batch`
    pub fn document_uri(&self) -> String {
        format!(
            "{}://doc-{}/{}/documents/batch",
            self.scheme, self.search_id, self.api_version
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default config file location: `<config dir>/cloudsearch/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("cloudsearch")
            .join("config.toml")
    }

    /// Load the default config file (defaults if it does not exist), then
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(None, |key| std::env::var(key).ok())
    }

    /// Load from `path`, or the default location when `None`, applying
    /// overrides read through `env`.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_overrides(env);
        Ok(settings)
    }

    /// Read settings from a TOML file. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CloudSearchError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Apply `CLOUDSEARCH_ID` and `CLOUDSEARCH_API_VERSION`.
    pub fn apply_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = env(ENV_SEARCH_ID).filter(|v| !v.is_empty()) {
            self.search_id = id;
        }
        if let Some(version) = env(ENV_API_VERSION).filter(|v| !v.is_empty()) {
            self.api_version = version;
        }
    }

    /// Fail unless the settings name a domain.
    pub fn validate(&self) -> Result<()> {
        if self.search_id.trim().is_empty() {
            return Err(CloudSearchError::ConfigError(format!(
                "No search domain configured (set search_id in {} or {})",
                Self::default_path().display(),
                ENV_SEARCH_ID
            )));
        }
        if self.max_batch_bytes == 0 {
            return Err(CloudSearchError::ConfigError(
                "max_batch_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
