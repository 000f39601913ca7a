//! Configuration file loading for streamchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./streamchat.toml` or `./.streamchat.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/streamchat/config.toml`
//! 4. Default values
//!
//! Command-line flags are applied on top by the presentation layer.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_HOST, FileAccountConfig, FileConfig, FileOutputConfig,
    FileServerConfig, FileTranscriptConfig,
};
pub use loader::ConfigLoader;
