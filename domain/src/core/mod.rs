//! Core domain concepts shared across all subdomains.
//!
//! - [`message::ChatMessage`]: a validated, non-empty chat message
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe string helpers

pub mod error;
pub mod message;
pub mod string;
