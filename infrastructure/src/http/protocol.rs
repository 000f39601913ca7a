//! JSON bodies exchanged with the chat service.
//!
//! - `POST /login`: [`LoginRequest`] → [`LoginResponse`]
//! - `POST /chat`: [`ChatRequest`] → streamed `event:`/`data:` blocks

use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Chat request body
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}
