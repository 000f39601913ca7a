//! Domain layer for streamchat
//!
//! This crate contains the session state machine, its value objects, and the
//! incremental decoder for streamed chat responses. It has no dependencies on
//! networking or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A [`Session`] moves through `Idle → Authenticating → Authenticated ⇄ Busy`,
//! falling to `Expired` when a chat call fails. Transitions are pure
//! functions returning the next session.
//!
//! ## Stream decoding
//!
//! A [`StreamDecoder`] turns the fragments of one response body into
//! [`StreamEvent`]s, whatever the fragment boundaries are.

pub mod core;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use crate::core::{error::DomainError, message::ChatMessage, string::truncate};
pub use session::{
    entities::{Session, SessionStatus},
    value_objects::{Credentials, HintTarget, HostBase, Role, Severity},
};
pub use stream::{
    BlockParser, DEFAULT_EVENT_TYPE, DecoderSummary, ERROR_EVENT_TYPE, StreamDecoder, StreamEvent,
    StreamFrame, Utf8Decoder,
};
