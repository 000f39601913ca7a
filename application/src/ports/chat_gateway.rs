//! Chat Gateway port
//!
//! Defines the interface for talking to the remote login and chat service.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use streamchat_domain::{ChatMessage, Credentials, HostBase};
use thiserror::Error;

/// Body of a chat response, delivered in whatever fragments the transport
/// produces.
pub type ByteStream = BoxStream<'static, Result<Bytes, GatewayError>>;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server answered with a non-2xx status.
    #[error("Request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The server answered 2xx but without a body to stream.
    #[error("Response has no body ({status})")]
    MissingBody { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway to the chat service
///
/// This port defines how the application layer reaches the remote service.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// `POST {host}/login`; returns the bearer token.
    async fn login(
        &self,
        host: &HostBase,
        credentials: &Credentials,
    ) -> Result<String, GatewayError>;

    /// `POST {host}/chat`; returns the streamed response body once the
    /// server has accepted the request.
    async fn open_chat(
        &self,
        host: &HostBase,
        token: &str,
        message: &ChatMessage,
    ) -> Result<ByteStream, GatewayError>;
}
