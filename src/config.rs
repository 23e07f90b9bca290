//! Runtime configuration
//!
//! Loaded from an optional TOML file; every field has a default so a partial
//! file (or none at all) is fine. Command line flags are applied on top by
//! the binary before [`Config::validate`] runs.

use crate::registry::RegistryConfig;
use crate::scheduler::SchedulerConfig;
use crate::wordlists::{WordList, WordListError};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub word_length: usize,
    pub max_attempts: u32,
    pub max_sessions: usize,
    pub word_retry_limit: usize,
    pub recent_words_limit: usize,
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
    pub stats_interval_secs: u64,
    /// Newline-delimited word file; the embedded list is used when absent
    pub word_list: Option<PathBuf>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_length: 5,
            max_attempts: 6,
            max_sessions: 1000,
            word_retry_limit: 50,
            recent_words_limit: 100,
            idle_timeout_secs: 3600,
            sweep_interval_secs: 60,
            stats_interval_secs: 300,
            word_list: None,
            debug: false,
        }
    }
}

impl Config {
    /// Parse a config from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML or unknown value types.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        info!(
            word_length = config.word_length,
            max_sessions = config.max_sessions,
            "Config loaded"
        );
        Ok(config)
    }

    /// Check that every numeric setting is positive
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("word_length", self.word_length as u64),
            ("max_attempts", u64::from(self.max_attempts)),
            ("max_sessions", self.max_sessions as u64),
            ("word_retry_limit", self.word_retry_limit as u64),
            ("recent_words_limit", self.recent_words_limit as u64),
            ("idle_timeout_secs", self.idle_timeout_secs),
            ("sweep_interval_secs", self.sweep_interval_secs),
            ("stats_interval_secs", self.stats_interval_secs),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ConfigError::Invalid(format!("{field} must be positive"))),
            None => Ok(()),
        }
    }

    /// # Errors
    /// Returns `ConfigError::Invalid` if `max_attempts` is zero.
    pub fn registry_config(&self) -> Result<RegistryConfig, ConfigError> {
        let max_attempts = NonZeroU32::new(self.max_attempts)
            .ok_or_else(|| ConfigError::Invalid("max_attempts must be positive".to_string()))?;
        Ok(RegistryConfig {
            max_attempts,
            max_sessions: self.max_sessions,
            word_retry_limit: self.word_retry_limit,
            recent_words_limit: self.recent_words_limit,
        })
    }

    #[must_use]
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            stats_interval: Duration::from_secs(self.stats_interval_secs),
            on_sweep: None,
        }
    }

    /// Build the word provider this config points at
    ///
    /// # Errors
    /// Returns `WordListError` if the file cannot be read or holds no usable words.
    pub fn load_words(&self) -> Result<WordList, WordListError> {
        match &self.word_list {
            Some(path) => WordList::from_file(path, self.word_length),
            None => WordList::embedded(self.word_length),
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
