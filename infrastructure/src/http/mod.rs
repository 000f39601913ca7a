//! HTTP adapter
//!
//! Implements [`ChatGateway`](streamchat_application::ChatGateway) over
//! plain HTTP with `reqwest`.

pub mod gateway;
pub mod protocol;

pub use gateway::{HttpChatGateway, HttpOptions};
