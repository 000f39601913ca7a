//! Domain error types

use crate::session::entities::SessionStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid service address: {0:?}")]
    InvalidHost(String),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Login returned an empty token")]
    EmptyToken,

    #[error("Cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionStatus,
        action: &'static str,
    },
}

impl DomainError {
    /// Check if this error was caused by the session being in the wrong state
    pub fn is_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
