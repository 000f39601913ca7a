//! Session domain entities

use serde::{Deserialize, Serialize};

use super::value_objects::HostBase;
use crate::core::error::DomainError;

/// Lifecycle state of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No token, nothing in flight
    #[default]
    Idle,
    /// Login request in flight
    Authenticating,
    /// Token held, ready to chat
    Authenticated,
    /// Chat request in flight
    Busy,
    /// A chat call failed and the token was dropped; same as `Idle` but the
    /// user is told to log in again
    Expired,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Authenticating => "authenticating",
            SessionStatus::Authenticated => "authenticated",
            SessionStatus::Busy => "busy",
            SessionStatus::Expired => "expired",
        }
    }

    /// True while a login or chat operation is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionStatus::Authenticating | SessionStatus::Busy)
    }

    /// True in the states that must hold a token
    pub fn holds_token(&self) -> bool {
        matches!(self, SessionStatus::Authenticated | SessionStatus::Busy)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication state of one client (Entity)
///
/// A plain value: every transition borrows the current session and returns
/// the next one, leaving the caller to decide where it is stored. The token
/// is present exactly when the status is `Authenticated` or `Busy`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    status: SessionStatus,
    host: Option<HostBase>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Host the current token was issued by
    pub fn host(&self) -> Option<&HostBase> {
        self.host.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.status.is_in_flight()
    }

    /// `Idle | Expired | Authenticated -> Authenticating`
    ///
    /// Starting a new login drops any token held so far.
    pub fn begin_login(&self) -> Result<Session, DomainError> {
        match self.status {
            SessionStatus::Idle | SessionStatus::Expired | SessionStatus::Authenticated => {
                Ok(Session {
                    token: None,
                    status: SessionStatus::Authenticating,
                    host: None,
                })
            }
            from => Err(DomainError::InvalidTransition {
                from,
                action: "log in",
            }),
        }
    }

    /// `Authenticating -> Authenticated`
    pub fn login_succeeded(&self, host: HostBase, token: String) -> Result<Session, DomainError> {
        self.require(SessionStatus::Authenticating, "complete login")?;
        if token.is_empty() {
            return Err(DomainError::EmptyToken);
        }
        Ok(Session {
            token: Some(token),
            status: SessionStatus::Authenticated,
            host: Some(host),
        })
    }

    /// `Authenticating -> Idle`
    pub fn login_failed(&self) -> Result<Session, DomainError> {
        self.require(SessionStatus::Authenticating, "fail login")?;
        Ok(Session::new())
    }

    /// `Authenticated -> Busy`
    pub fn begin_chat(&self) -> Result<Session, DomainError> {
        self.require(SessionStatus::Authenticated, "send a message")?;
        Ok(Session {
            status: SessionStatus::Busy,
            ..self.clone()
        })
    }

    /// `Busy -> Authenticated`
    pub fn chat_succeeded(&self) -> Result<Session, DomainError> {
        self.require(SessionStatus::Busy, "complete chat")?;
        Ok(Session {
            status: SessionStatus::Authenticated,
            ..self.clone()
        })
    }

    /// `Busy -> Expired`, dropping the token.
    pub fn chat_failed(&self) -> Result<Session, DomainError> {
        self.require(SessionStatus::Busy, "fail chat")?;
        Ok(Session {
            token: None,
            status: SessionStatus::Expired,
            host: None,
        })
    }

    /// Any settled state `-> Idle`, dropping the token.
    pub fn logout(&self) -> Result<Session, DomainError> {
        if self.is_in_flight() {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                action: "log out",
            });
        }
        Ok(Session::new())
    }

    fn require(&self, status: SessionStatus, action: &'static str) -> Result<(), DomainError> {
        if self.status == status {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: self.status,
                action,
            })
        }
    }
}
