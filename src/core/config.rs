//! Logger configuration
//!
//! [`LoggerConfig`] derives `Deserialize` with defaults on every field, so it
//! can be embedded in an application's own configuration file:
//!
//! ```
//! use rust_log_facade::core::{Destination, LoggerConfig};
//!
//! let config: LoggerConfig =
//!     serde_json::from_str(r#"{"persist_to_file": true, "log_dir": "/var/log/app"}"#).unwrap();
//! assert_eq!(config.destination(), Destination::FileAndConsole);
//! assert!(config.file_path().ends_with("all.log"));
//! ```

use super::encoder::EncoderConfig;
use super::error::Result;
use super::log_level::LogLevel;
use crate::appenders::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "all.log";

/// Which set of appenders a logger is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Standard output only
    Console,
    /// Rotating file plus standard output, every record goes to both
    FileAndConsole,
}

impl From<bool> for Destination {
    fn from(persist_to_file: bool) -> Self {
        if persist_to_file {
            Destination::FileAndConsole
        } else {
            Destination::Console
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub persist_to_file: bool,
    pub log_dir: PathBuf,
    pub file_name: String,
    pub min_level: LogLevel,
    /// Logger name written under the `logger` key
    pub name: Option<String>,
    /// Records at or above this level carry a stacktrace
    pub stacktrace_level: Option<LogLevel>,
    pub encoder: EncoderConfig,
    pub rotation: RotationPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            persist_to_file: false,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            file_name: DEFAULT_LOG_FILE.to_string(),
            min_level: LogLevel::Debug,
            name: None,
            stacktrace_level: None,
            encoder: EncoderConfig::default(),
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new(persist_to_file: bool) -> Self {
        Self {
            persist_to_file,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonError`](crate::core::LoggerError::JsonError)
    /// for malformed JSON or unknown values.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    #[must_use]
    pub fn destination(&self) -> Destination {
        Destination::from(self.persist_to_file)
    }

    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }
}
