//! Use cases (application services)
//!
//! - [`session_controller`]: login and streamed chat for one session

pub mod session_controller;
