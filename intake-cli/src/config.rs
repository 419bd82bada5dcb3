//! Configuration file for `tax-intake`.
//!
//! Every section is optional; anything left out falls back to the defaults
//! below. Command-line flags override the file.
//!
//! # Example
//!
//! ```toml
//! [logging]
//! level = "info"
//! file = "intake.log"
//! console = true
//!
//! [session]
//! today = "2024-05-01"
//!
//! [[session.preset]]
//! field = "incomeCategory"
//! value = "B"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::script::Edit;

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub logging: LoggingConfig,
    pub session: SessionConfig,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"intake_core=debug"`.
    pub level: String,
    /// Log file, appended to.
    pub file: Option<PathBuf>,
    /// Whether to log to stderr.
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console: true,
        }
    }
}

/// `[session]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Reference date; the local calendar date when absent.
    pub today: Option<NaiveDate>,
    /// Edits applied to every new session before any script.
    #[serde(rename = "preset")]
    pub presets: Vec<Edit>,
}

impl IntakeConfig {
    pub fn load_from_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&contents)
    }
}
