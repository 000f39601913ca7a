//! Presentation-level configuration
//!
//! Configuration for console output and REPL behavior.

use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Show status lines and the busy spinner
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_progress: true,
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplConfig {
    /// Base address of the chat service
    pub host: String,
    /// Account name offered when asking for credentials
    pub username: Option<String>,
    /// Password for the first login; later logins always prompt
    pub password: Option<String>,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl ReplConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            history_file: Self::default_history_file(),
            ..Default::default()
        }
    }

    /// `$XDG_DATA_HOME/streamchat/history.txt`
    pub fn default_history_file() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("streamchat").join("history.txt"))
    }
}
