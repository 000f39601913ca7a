//! Chat message value object

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A message the user wants to send (Value Object)
///
/// Always holds trimmed, non-empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    content: String,
}

impl ChatMessage {
    /// Validate and trim the raw input.
    pub fn try_new(content: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the message content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for ChatMessage {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        ChatMessage::try_new(s)
    }
}
