//! Configuration for the testbench harness.
//!
//! This module defines the optional knobs of a run. It provides:
//! 1. **Defaults:** Baseline values used when no configuration file is given.
//! 2. **Structure:** A flat `Config` deserialized from JSON with per-field defaults.
//! 3. **Loading:** Helpers to read a configuration from a string or a file.
//!
//! The memory-image path and the cycle budget are not part of this structure; they
//! come from the positional arguments (see `RunConfig`).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the harness.
mod defaults {
    /// Environment key through which the memory-image path is published.
    pub const ENV_KEY: &str = crate::common::constants::DEFAULT_ENV_KEY;

    /// Full cycles between progress log events (0 disables progress logging).
    pub const PROGRESS_INTERVAL: u64 = 0;

    /// Whether the run summary is printed on completion.
    pub const PRINT_SUMMARY: bool = false;

    pub fn env_key() -> String {
        ENV_KEY.to_string()
    }

    pub const fn progress_interval() -> u64 {
        PROGRESS_INTERVAL
    }

    pub const fn print_summary() -> bool {
        PRINT_SUMMARY
    }
}

/// Root harness configuration.
///
/// Every field is optional in the JSON form; unknown fields are rejected so that
/// typos surface as configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Environment key used to publish the memory-image path during construction.
    #[serde(default = "defaults::env_key")]
    pub env_key: String,
    /// Full cycles between progress log events; 0 disables them.
    #[serde(default = "defaults::progress_interval")]
    pub progress_interval: u64,
    /// Print the run summary to stdout when the run completes.
    #[serde(default = "defaults::print_summary")]
    pub print_summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_key: defaults::env_key(),
            progress_interval: defaults::progress_interval(),
            print_summary: defaults::print_summary(),
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON object with any subset of the configuration fields.
    ///
    /// # Returns
    ///
    /// The parsed configuration, `ConfigError::Parse` on malformed input, or
    /// `ConfigError::InvalidEnvKey` if the key cannot name an environment variable.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that `env_key` can name an environment variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvKey` for an empty key or one containing `=` or NUL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.env_key.is_empty() || self.env_key.contains(['=', '\0']) {
            return Err(ConfigError::InvalidEnvKey {
                key: self.env_key.clone(),
            });
        }
        Ok(())
    }

    /// Reads and parses a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a JSON configuration file.
    ///
    /// # Returns
    ///
    /// The parsed configuration, `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Parse` if its contents are invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
