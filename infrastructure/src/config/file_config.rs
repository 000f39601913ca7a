//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Passwords are never read from configuration.

use crate::http::HttpOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Service address used when nothing else is configured
pub const DEFAULT_HOST: &str = "http://localhost:8082";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("server.host cannot be empty")]
    EmptyHost,
}

/// Raw server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base address of the chat service
    pub host: String,
    /// Timeout for establishing a connection
    pub connect_timeout_seconds: u64,
    /// Overall timeout for the login request; unbounded when unset
    pub login_timeout_seconds: Option<u64>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            connect_timeout_seconds: 10,
            login_timeout_seconds: None,
        }
    }
}

impl FileServerConfig {
    /// Transport settings for the HTTP gateway
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
            login_timeout: self.login_timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Raw account configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAccountConfig {
    pub username: Option<String>,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Raw transcript configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// JSONL file receiving the conversation, if any
    pub path: Option<String>,
}

/// Complete file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub account: FileAccountConfig,
    pub output: FileOutputConfig,
    pub transcript: FileTranscriptConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "server.connect_timeout_seconds",
            ));
        }
        if let Some(0) = self.server.login_timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout(
                "server.login_timeout_seconds",
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigValidationError::EmptyHost);
        }
        Ok(())
    }
}
