//! Incremental decoding of a streamed chat response.
//!
//! The chat endpoint answers with a text body made of blank-line separated
//! blocks of `event: ` / `data: ` lines. The body arrives in arbitrary
//! fragments, so every stage here is incremental:
//!
//! - [`utf8::Utf8Decoder`]: bytes to text, carrying split characters over
//! - [`decoder::BlockParser`]: text to [`frame::StreamFrame`]s, carrying
//!   unterminated blocks over
//! - [`decoder::StreamDecoder`]: both of the above, producing
//!   [`frame::StreamEvent`]s and stopping at the first error frame

pub mod decoder;
pub mod frame;
pub mod utf8;

#[cfg(test)]
mod proptests;

pub use decoder::{BlockParser, DecoderSummary, StreamDecoder};
pub use frame::{DEFAULT_EVENT_TYPE, ERROR_EVENT_TYPE, StreamEvent, StreamFrame};
pub use utf8::Utf8Decoder;
