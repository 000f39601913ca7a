//! HTTP gateway implementation
//!
//! Implements the [`ChatGateway`] port over `reqwest`. The chat body is
//! handed back as a byte stream without any buffering, so fragments reach
//! the decoder exactly as the network delivers them.

use super::protocol::{ChatRequest, LoginRequest, LoginResponse};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use streamchat_application::ports::chat_gateway::{ByteStream, ChatGateway, GatewayError};
use streamchat_domain::{ChatMessage, Credentials, HostBase};
use tracing::{debug, info};

const INVALID_LOGIN_RESPONSE: &str = "invalid login response";

/// Transport settings for [`HttpChatGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    /// Upper bound for establishing a TCP/TLS connection.
    pub connect_timeout: Duration,
    /// Overall bound for the login request. Chat streams are never bounded.
    pub login_timeout: Option<Duration>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            login_timeout: None,
        }
    }
}

/// Gateway to the chat service over HTTP
pub struct HttpChatGateway {
    client: Client,
    login_timeout: Option<Duration>,
}

impl HttpChatGateway {
    /// Create a gateway with default transport settings.
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_options(HttpOptions::default())
    }

    pub fn with_options(options: HttpOptions) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .user_agent(concat!("streamchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            login_timeout: options.login_timeout,
        })
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn login(
        &self,
        host: &HostBase,
        credentials: &Credentials,
    ) -> Result<String, GatewayError> {
        let url = host.endpoint("login");
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(&LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        });
        if let Some(timeout) = self.login_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(rejected(response).await);
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            debug!("Unparsable login response: {}", e);
            GatewayError::InvalidResponse(INVALID_LOGIN_RESPONSE.to_string())
        })?;
        if body.token.is_empty() {
            return Err(GatewayError::InvalidResponse(
                INVALID_LOGIN_RESPONSE.to_string(),
            ));
        }

        info!("Received token from {}", url);
        Ok(body.token)
    }

    async fn open_chat(
        &self,
        host: &HostBase,
        token: &str,
        message: &ChatMessage,
    ) -> Result<ByteStream, GatewayError> {
        let url = host.endpoint("chat");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&ChatRequest {
                message: message.content(),
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejected(response).await);
        }
        if matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT) {
            return Err(GatewayError::MissingBody {
                status: status.as_u16(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(transport_error))
            .boxed())
    }
}

async fn rejected(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    debug!(status, "Request rejected");
    GatewayError::Rejected { status, body }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(error.to_string())
    }
}
