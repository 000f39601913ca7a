//! Session controller use case
//!
//! Drives the login and chat flows: validates input, moves the [`Session`]
//! through its states, calls the gateway, decodes the streamed reply, and
//! reports every step to the [`MessageRenderer`].

use crate::ports::chat_gateway::{ChatGateway, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::renderer::MessageRenderer;
use futures::StreamExt;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use streamchat_domain::{
    ChatMessage, Credentials, DomainError, HintTarget, HostBase, Role, Session, Severity,
    StreamDecoder, StreamEvent, truncate,
};
use thiserror::Error;
use tracing::{debug, info, warn};

const STATUS_LOGGED_OUT: &str = "Not logged in";
const STATUS_LOGGING_IN: &str = "Logging in…";
const STATUS_LOGGED_IN: &str = "Logged in";
const STATUS_CHATTING: &str = "Chatting…";
const STATUS_RELOGIN: &str = "Re-login required";

const HINT_INVALID_HOST: &str = "Please enter a valid service address.";
const HINT_REQUESTING_TOKEN: &str = "Requesting token…";
const HINT_LOGGED_IN: &str = "Token acquired, start chatting!";
const HINT_LOGGED_OUT: &str = "Logged out.";
const HINT_LOGIN_FIRST: &str = "Please log in to obtain a token first.";
const HINT_WAITING: &str = "Waiting for model…";
const HINT_DONE: &str = "Done.";

const UNKNOWN_ERROR: &str = "unknown error";

/// Errors surfaced by the session controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid service address: {0:?}")]
    InvalidHost(String),

    #[error("Login failed ({status}): {body}")]
    LoginRejected { status: u16, body: String },

    #[error("Login failed: {0}")]
    LoginTransportError(String),

    #[error("Request failed ({status}): {body}")]
    ChatRejected { status: u16, body: String },

    #[error("Connection lost: {0}")]
    ChatTransportError(String),

    /// The server sent an `error` frame; the message is its payload.
    #[error("{message}")]
    StreamAborted { message: String },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid session state: {0}")]
    InvalidState(#[from] DomainError),
}

impl SessionError {
    /// Whether this error drops the token and forces a new login
    pub fn requires_relogin(&self) -> bool {
        matches!(
            self,
            SessionError::ChatRejected { .. }
                | SessionError::ChatTransportError(_)
                | SessionError::StreamAborted { .. }
        )
    }

    fn from_login(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected { status, body } => SessionError::LoginRejected {
                status,
                body: body_or_unknown(body),
            },
            GatewayError::MissingBody { status } => SessionError::LoginRejected {
                status,
                body: UNKNOWN_ERROR.to_string(),
            },
            GatewayError::InvalidResponse(detail) => SessionError::LoginTransportError(detail),
            other => SessionError::LoginTransportError(other.to_string()),
        }
    }

    fn from_chat(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected { status, body } => SessionError::ChatRejected {
                status,
                body: body_or_unknown(body),
            },
            GatewayError::MissingBody { status } => SessionError::ChatRejected {
                status,
                body: UNKNOWN_ERROR.to_string(),
            },
            other => SessionError::ChatTransportError(other.to_string()),
        }
    }
}

fn body_or_unknown(body: String) -> String {
    if body.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        body
    }
}

/// Result of a submission that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The operation ran to completion.
    Completed,
    /// Another operation was in flight; nothing happened.
    Ignored,
}

/// Use case owning one chat session
///
/// At most one login or chat operation runs at a time. A submission made
/// while another is in flight returns [`Submission::Ignored`] without
/// touching the session or the renderer. The session lock is never held
/// across an `.await`.
pub struct SessionController<G: ChatGateway + 'static> {
    gateway: Arc<G>,
    renderer: Arc<dyn MessageRenderer>,
    logger: Arc<dyn ConversationLogger>,
    session: Mutex<Session>,
}

enum ChatStart {
    Ready {
        host: HostBase,
        token: String,
        message: ChatMessage,
    },
    Busy,
    NotAuthenticated,
    Empty,
}

impl<G: ChatGateway + 'static> SessionController<G> {
    /// Create a controller with an empty session.
    ///
    /// The renderer is put into its logged-out state right away.
    pub fn new(gateway: Arc<G>, renderer: Arc<dyn MessageRenderer>) -> Self {
        renderer.lock_input(true);
        renderer.set_status(Severity::Idle, STATUS_LOGGED_OUT);
        Self {
            gateway,
            renderer,
            logger: Arc::new(NoConversationLogger),
            session: Mutex::new(Session::new()),
        }
    }

    /// Record the conversation through the given logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.lock().clone()
    }

    /// Log in against `host_input` (normalized before use).
    pub async fn submit_login(
        &self,
        host_input: &str,
        credentials: &Credentials,
    ) -> Result<Submission, SessionError> {
        let host = {
            let mut session = self.lock();
            if session.is_in_flight() {
                debug!("Ignoring login while {} is in flight", session.status());
                return Ok(Submission::Ignored);
            }
            match HostBase::parse(host_input) {
                Ok(host) => {
                    *session = session.begin_login()?;
                    host
                }
                Err(_) => {
                    drop(session);
                    warn!("Rejected service address {:?}", host_input);
                    self.renderer
                        .set_hint(HintTarget::Login, HINT_INVALID_HOST, true);
                    return Err(SessionError::InvalidHost(host_input.to_string()));
                }
            }
        };

        self.renderer.set_status(Severity::Busy, STATUS_LOGGING_IN);
        self.renderer
            .set_hint(HintTarget::Login, HINT_REQUESTING_TOKEN, false);
        self.renderer.lock_input(true);

        info!("Logging in to {} as {:?}", host, credentials.username());
        let result = match self.gateway.login(&host, credentials).await {
            Ok(token) => self
                .transition(|s| s.login_succeeded(host.clone(), token))
                .map_err(|e| match e {
                    DomainError::EmptyToken => {
                        SessionError::LoginTransportError("empty token".to_string())
                    }
                    other => SessionError::InvalidState(other),
                }),
            Err(e) => Err(SessionError::from_login(e)),
        };

        match result {
            Ok(_) => {
                info!("Login succeeded");
                self.renderer.set_status(Severity::Ok, STATUS_LOGGED_IN);
                self.renderer
                    .set_hint(HintTarget::Login, HINT_LOGGED_IN, false);
                self.renderer.lock_input(false);
                self.log_login(&host, credentials, None);
                Ok(Submission::Completed)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.force(Session::login_failed);
                self.renderer
                    .set_hint(HintTarget::Login, &e.to_string(), true);
                self.renderer.set_status(Severity::Idle, STATUS_LOGGED_OUT);
                self.log_login(&host, credentials, Some(&e));
                Err(e)
            }
        }
    }

    /// Send a message and stream the reply into the transcript.
    ///
    /// Any failure after the request was sent drops the token; text already
    /// streamed into the transcript stays there.
    pub async fn submit_message(&self, text: &str) -> Result<Submission, SessionError> {
        let (host, token, message) = match self.begin_chat(text)? {
            ChatStart::Ready {
                host,
                token,
                message,
            } => (host, token, message),
            ChatStart::Busy => return Ok(Submission::Ignored),
            ChatStart::NotAuthenticated => {
                self.renderer
                    .set_hint(HintTarget::Chat, HINT_LOGIN_FIRST, true);
                return Err(SessionError::NotAuthenticated);
            }
            ChatStart::Empty => return Err(SessionError::EmptyMessage),
        };

        self.renderer.append_message(Role::User, message.content());
        self.renderer.set_hint(HintTarget::Chat, HINT_WAITING, false);
        self.renderer.set_status(Severity::Busy, STATUS_CHATTING);
        self.renderer.lock_input(true);
        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({ "text": message.content() }),
        ));

        debug!("Sending message: {}", truncate(message.content(), 80));
        let outcome = self.stream_reply(&host, &token, &message).await;

        let result = match outcome {
            Ok(reply) => {
                info!(bytes = reply.len(), "Chat completed");
                self.force(Session::chat_succeeded);
                self.renderer.set_status(Severity::Ok, STATUS_LOGGED_IN);
                self.renderer.set_hint(HintTarget::Chat, HINT_DONE, false);
                self.logger.log(ConversationEvent::new(
                    "model_response",
                    json!({ "text": reply }),
                ));
                Ok(Submission::Completed)
            }
            Err(e) => {
                warn!("Chat failed, dropping token: {}", e);
                self.force(Session::chat_failed);
                let text = e.to_string();
                self.renderer.append_message(Role::Error, &text);
                self.renderer.set_hint(HintTarget::Chat, &text, true);
                self.renderer.set_status(Severity::Idle, STATUS_RELOGIN);
                self.logger.log(ConversationEvent::new(
                    "chat_error",
                    json!({ "message": text }),
                ));
                Err(e)
            }
        };

        self.renderer.lock_input(false);
        result
    }

    /// Drop the token and return to `Idle`.
    pub fn logout(&self) -> Submission {
        {
            let mut session = self.lock();
            match session.logout() {
                Ok(next) => *session = next,
                Err(_) => {
                    debug!("Ignoring logout while {} is in flight", session.status());
                    return Submission::Ignored;
                }
            }
        }

        info!("Logged out");
        self.renderer.set_status(Severity::Idle, STATUS_LOGGED_OUT);
        self.renderer
            .set_hint(HintTarget::Login, HINT_LOGGED_OUT, false);
        self.renderer.lock_input(true);
        Submission::Completed
    }

    fn begin_chat(&self, text: &str) -> Result<ChatStart, SessionError> {
        let mut session = self.lock();
        if session.is_in_flight() {
            debug!("Ignoring message while {} is in flight", session.status());
            return Ok(ChatStart::Busy);
        }

        let (Some(host), Some(token)) = (session.host().cloned(), session.token()) else {
            return Ok(ChatStart::NotAuthenticated);
        };
        let token = token.to_string();

        let Ok(message) = ChatMessage::try_new(text) else {
            return Ok(ChatStart::Empty);
        };

        *session = session.begin_chat()?;
        Ok(ChatStart::Ready {
            host,
            token,
            message,
        })
    }

    async fn stream_reply(
        &self,
        host: &HostBase,
        token: &str,
        message: &ChatMessage,
    ) -> Result<String, SessionError> {
        let mut body = self
            .gateway
            .open_chat(host, token, message)
            .await
            .map_err(SessionError::from_chat)?;

        let mut target = self.renderer.append_message(Role::Model, "");
        let mut decoder = StreamDecoder::new();
        let mut reply = String::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(SessionError::from_chat)?;
            for event in decoder.feed(&chunk) {
                match event {
                    StreamEvent::Message(text) => {
                        target.append_text(&text);
                        reply.push_str(&text);
                    }
                    StreamEvent::Error(message) => {
                        return Err(SessionError::StreamAborted { message });
                    }
                }
            }
        }

        let summary = decoder.finish();
        if summary.discarded_bytes > 0 {
            debug!(
                bytes = summary.discarded_bytes,
                "Discarded unterminated trailing block"
            );
        }
        Ok(reply)
    }

    fn log_login(&self, host: &HostBase, credentials: &Credentials, error: Option<&SessionError>) {
        self.logger.log(ConversationEvent::new(
            "login",
            json!({
                "host": host.as_str(),
                "username": credentials.username(),
                "success": error.is_none(),
                "error": error.map(|e| e.to_string()),
            }),
        ));
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(
        &self,
        step: impl FnOnce(&Session) -> Result<Session, DomainError>,
    ) -> Result<Session, DomainError> {
        let mut session = self.lock();
        let next = step(&session)?;
        *session = next.clone();
        Ok(next)
    }

    /// Apply a transition that the in-flight guard makes infallible.
    fn force(&self, step: fn(&Session) -> Result<Session, DomainError>) {
        if let Err(e) = self.transition(step) {
            warn!("Unexpected session transition failure: {}", e);
        }
    }
}
