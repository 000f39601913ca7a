//! Session value objects

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::error::DomainError;

/// Validated base URL of the chat service (Value Object)
///
/// Holds the trimmed input with trailing slashes stripped. Only absolute
/// `http`/`https` URLs with a host are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostBase(String);

impl HostBase {
    /// Normalize and validate a host string.
    ///
    /// ```
    /// use streamchat_domain::HostBase;
    ///
    /// let host = HostBase::parse(" http://localhost:8082// ").unwrap();
    /// assert_eq!(host.as_str(), "http://localhost:8082");
    /// assert!(HostBase::parse("example.com ").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim().trim_end_matches('/');
        if !trimmed.starts_with("http") {
            return Err(DomainError::InvalidHost(input.to_string()));
        }

        let url = Url::parse(trimmed).map_err(|_| DomainError::InvalidHost(input.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(DomainError::InvalidHost(input.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The normalized base URL
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an endpoint path onto the base (`/login`, `/chat`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl std::fmt::Display for HostBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HostBase {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HostBase::parse(&value)
    }
}

impl From<HostBase> for String {
    fn from(host: HostBase) -> Self {
        host.0
    }
}

/// Login credentials
///
/// The username is trimmed; the password is kept verbatim. `Debug` never
/// prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl AsRef<str>, password: impl Into<String>) -> Self {
        Self {
            username: username.as_ref().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Error,
}

impl Role {
    /// Short label shown next to a transcript entry
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Model => "model",
            Role::Error => "error",
        }
    }
}

/// Severity of the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Idle,
    Busy,
    Ok,
}

/// Which hint line a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintTarget {
    Login,
    Chat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_strips_trailing_slashes_and_whitespace() {
        let host = HostBase::parse("  https://chat.example.com/api///  ").unwrap();
        assert_eq!(host.as_str(), "https://chat.example.com/api");
        assert_eq!(host.endpoint("/login"), "https://chat.example.com/api/login");
        assert_eq!(host.endpoint("chat"), "https://chat.example.com/api/chat");
    }

    #[test]
    fn test_host_without_scheme_rejected() {
        assert_eq!(
            HostBase::parse("example.com "),
            Err(DomainError::InvalidHost("example.com ".to_string()))
        );
    }

    #[test]
    fn test_host_empty_rejected() {
        assert!(HostBase::parse("").is_err());
        assert!(HostBase::parse("   ").is_err());
        assert!(HostBase::parse("///").is_err());
    }

    #[test]
    fn test_host_non_http_scheme_rejected() {
        assert!(HostBase::parse("httpx://example.com").is_err());
        assert!(HostBase::parse("ftp://example.com").is_err());
        assert!(HostBase::parse("http://").is_err());
    }

    #[test]
    fn test_host_deserialize_validates() {
        let host: HostBase = serde_json::from_str("\"http://localhost:8082/\"").unwrap();
        assert_eq!(host.as_str(), "http://localhost:8082");
        assert!(serde_json::from_str::<HostBase>("\"localhost\"").is_err());
    }

    #[test]
    fn test_credentials_trim_username_only() {
        let creds = Credentials::new("  alice ", " secret ");
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), " secret ");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "you");
        assert_eq!(Role::Model.label(), "model");
        assert_eq!(Role::Error.label(), "error");
    }
}
