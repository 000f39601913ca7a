//! Rendering surface port
//!
//! The session controller reports everything the user should see through
//! this interface. It owns no rendering state itself.

use streamchat_domain::{HintTarget, Role, Severity};

/// A transcript entry that can keep growing while a reply streams in.
pub trait MessageHandle: Send {
    /// Append text to the end of this entry.
    fn append_text(&mut self, text: &str);
}

/// Output sink for the chat session
///
/// Implementations live in the presentation layer and can display the
/// transcript in various ways (console, web UI, etc.)
pub trait MessageRenderer: Send + Sync {
    /// Add a transcript entry and return a handle for streaming more text into it.
    fn append_message(&self, role: Role, text: &str) -> Box<dyn MessageHandle>;

    /// Update the status indicator.
    fn set_status(&self, severity: Severity, text: &str);

    /// Replace the hint line of the login or chat area.
    fn set_hint(&self, target: HintTarget, text: &str, is_error: bool);

    /// Enable or disable the message input and send action.
    fn lock_input(&self, disabled: bool);
}

/// No-op renderer for headless use
pub struct NoopRenderer;

struct NoopHandle;

impl MessageHandle for NoopHandle {
    fn append_text(&mut self, _text: &str) {}
}

impl MessageRenderer for NoopRenderer {
    fn append_message(&self, _role: Role, _text: &str) -> Box<dyn MessageHandle> {
        Box::new(NoopHandle)
    }
    fn set_status(&self, _severity: Severity, _text: &str) {}
    fn set_hint(&self, _target: HintTarget, _text: &str, _is_error: bool) {}
    fn lock_input(&self, _disabled: bool) {}
}
