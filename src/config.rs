//! Configuration file parser for `beam.toml`.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::util::{validate_source_url, UrlValidationError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid URL for source '{name}': {source}")]
    InvalidSource {
        name: String,
        #[source]
        source: UrlValidationError,
    },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// One `[[sources]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Top-level aggregator configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title of the aggregated feed.
    pub title: String,

    /// Public URL of the aggregated feed document.
    pub feed_url: String,

    /// Address the HTTP server binds to.
    pub listen: SocketAddr,

    /// Seconds between scheduled cycles. 0 = manual refresh only.
    pub refresh_interval_secs: u64,

    /// Per-source fetch deadline in seconds.
    pub fetch_timeout_secs: u64,

    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Tech News Aggregator".to_string(),
            feed_url: "http://localhost:8181/feed.json".to_string(),
            listen: SocketAddr::from(([127, 0, 0, 1], 8181)),
            refresh_interval_secs: 300,
            fetch_timeout_secs: 30,
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "title",
        "feed_url",
        "listen",
        "refresh_interval_secs",
        "fetch_timeout_secs",
        "sources",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Source with a non-http(s) URL → `Err(ConfigError::InvalidSource)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            sources = config.sources.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text. Blank text yields defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate_sources()?;
        Ok(config)
    }

    fn validate_sources(&self) -> Result<(), ConfigError> {
        for source in &self.sources {
            validate_source_url(&source.url).map_err(|e| ConfigError::InvalidSource {
                name: source.name.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
