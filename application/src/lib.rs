//! Application layer for streamchat
//!
//! This crate contains the session controller use case and the port
//! definitions it drives. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chat_gateway::{ByteStream, ChatGateway, GatewayError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    renderer::{MessageHandle, MessageRenderer, NoopRenderer},
};
pub use use_cases::session_controller::{SessionController, SessionError, Submission};
