//! Chat session domain.
//!
//! - [`entities::Session`]: authentication and in-flight state of one client
//! - [`entities::SessionStatus`]: lifecycle states of the session
//! - [`value_objects`]: host, credentials, and the renderer vocabulary

pub mod entities;
pub mod value_objects;
