//! Infrastructure layer for streamchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, DEFAULT_HOST, FileAccountConfig, FileConfig,
    FileOutputConfig, FileServerConfig, FileTranscriptConfig,
};
pub use http::{
    gateway::{HttpChatGateway, HttpOptions},
    protocol::{ChatRequest, LoginRequest, LoginResponse},
};
pub use logging::JsonlConversationLogger;
