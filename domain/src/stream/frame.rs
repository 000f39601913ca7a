//! Frames and events produced by the stream decoder.

/// Event type used when a block has no `event:` line.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// Event type that aborts the stream.
pub const ERROR_EVENT_TYPE: &str = "error";

/// One `data:` line together with the event type active in its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    event_type: String,
    payload: String,
}

impl StreamFrame {
    pub fn new(event_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: payload.into(),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn is_error(&self) -> bool {
        self.event_type == ERROR_EVENT_TYPE
    }
}

/// An event in a streaming chat response.
///
/// Every frame that is not an `error` frame is payload to append, whatever
/// its event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text to append to the response, verbatim.
    Message(String),
    /// In-band failure; the stream ends here.
    Error(String),
}

impl StreamEvent {
    /// Returns the payload text regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            StreamEvent::Message(s) | StreamEvent::Error(s) => s,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error(_))
    }
}

impl From<StreamFrame> for StreamEvent {
    fn from(frame: StreamFrame) -> Self {
        if frame.is_error() {
            StreamEvent::Error(frame.payload)
        } else {
            StreamEvent::Message(frame.payload)
        }
    }
}
