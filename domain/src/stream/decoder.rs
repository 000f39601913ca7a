//! Block framing and the stream decoder.

use super::frame::{DEFAULT_EVENT_TYPE, StreamEvent, StreamFrame};
use super::utf8::Utf8Decoder;

const BLOCK_DELIMITER: &str = "\n\n";
const EVENT_PREFIX: &str = "event: ";
const DATA_PREFIX: &str = "data: ";

/// Splits decoded text into blocks and blocks into frames.
///
/// Text after the last `\n\n` is kept until a later push completes it.
/// Lines other than `event: ` and `data: ` are ignored.
#[derive(Debug)]
pub struct BlockParser {
    pending: String,
    current_event: String,
}

impl BlockParser {
    pub fn new() -> Self {
        Self {
            pending: String::new(),
            current_event: DEFAULT_EVENT_TYPE.to_string(),
        }
    }

    /// Append text and return the frames of every block it completes.
    pub fn push(&mut self, text: &str) -> Vec<StreamFrame> {
        // Only the new text, plus one byte before it, can complete a delimiter.
        let search_from = self
            .pending
            .len()
            .saturating_sub(BLOCK_DELIMITER.len() - 1);
        self.pending.push_str(text);
        if !contains_delimiter(&self.pending.as_bytes()[search_from..]) {
            return Vec::new();
        }

        let buffer = std::mem::take(&mut self.pending);
        let mut blocks: Vec<&str> = buffer.split(BLOCK_DELIMITER).collect();
        let tail = blocks.pop().unwrap_or_default();

        let mut frames = Vec::new();
        for block in blocks {
            self.parse_block(block, &mut frames);
        }
        self.pending = tail.to_string();
        frames
    }

    /// Text received but not yet terminated by a blank line
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Drop any buffered text.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.current_event = DEFAULT_EVENT_TYPE.to_string();
    }

    fn parse_block(&mut self, block: &str, frames: &mut Vec<StreamFrame>) {
        for line in block.split('\n') {
            if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
                let name = name.trim();
                self.current_event = if name.is_empty() {
                    DEFAULT_EVENT_TYPE.to_string()
                } else {
                    name.to_string()
                };
                continue;
            }
            if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
                frames.push(StreamFrame::new(self.current_event.clone(), payload));
            }
        }
        self.current_event = DEFAULT_EVENT_TYPE.to_string();
    }
}

fn contains_delimiter(bytes: &[u8]) -> bool {
    bytes
        .windows(BLOCK_DELIMITER.len())
        .any(|window| window == BLOCK_DELIMITER.as_bytes())
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// What was left over when a stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderSummary {
    /// Payload and error events produced
    pub events: usize,
    /// Bytes of text in an unterminated trailing block, dropped unread
    pub discarded_bytes: usize,
    /// Whether the stream stopped at an error frame
    pub aborted: bool,
}

/// Decoder for one chat response body.
///
/// Feed it the body fragments in arrival order. Every `data:` line becomes a
/// [`StreamEvent`]; the first [`StreamEvent::Error`] ends decoding and all
/// later input, including the rest of the same block, is ignored.
///
/// ```
/// use streamchat_domain::{StreamDecoder, StreamEvent};
///
/// let mut decoder = StreamDecoder::new();
/// assert!(decoder.feed(b"event: message\ndata: Hel").is_empty());
/// assert_eq!(
///     decoder.feed(b"lo\n\n"),
///     vec![StreamEvent::Message("Hello".to_string())]
/// );
/// ```
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8Decoder,
    parser: BlockParser,
    events: usize,
    aborted: bool,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next body fragment.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        if self.aborted {
            return Vec::new();
        }

        let text = self.utf8.decode(bytes);
        let mut events = Vec::new();
        for frame in self.parser.push(&text) {
            let event = StreamEvent::from(frame);
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                self.aborted = true;
                self.parser.reset();
                break;
            }
        }
        self.events += events.len();
        events
    }

    /// True once an error frame has been decoded
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// End of body. An unterminated trailing block is dropped, not reported
    /// as an error.
    pub fn finish(self) -> DecoderSummary {
        let discarded_bytes = if self.aborted {
            0
        } else {
            self.parser.pending().len() + self.utf8.finish().len()
        };
        DecoderSummary {
            events: self.events,
            discarded_bytes,
            aborted: self.aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(s: &str) -> StreamEvent {
        StreamEvent::Message(s.to_string())
    }

    fn feed_all(fragments: &[&str]) -> (Vec<StreamEvent>, DecoderSummary) {
        let mut decoder = StreamDecoder::new();
        let mut events = Vec::new();
        for fragment in fragments {
            events.extend(decoder.feed(fragment.as_bytes()));
        }
        (events, decoder.finish())
    }

    #[test]
    fn test_frame_split_across_fragments() {
        let (events, summary) = feed_all(&["event: message\ndata: Hel", "lo\n\n"]);
        assert_eq!(events, vec![message("Hello")]);
        assert_eq!(summary.events, 1);
        assert_eq!(summary.discarded_bytes, 0);
        assert!(!summary.aborted);
    }

    #[test]
    fn test_error_frame_aborts() {
        let (events, summary) = feed_all(&["event: error\ndata: quota exceeded\n\n"]);
        assert_eq!(events, vec![StreamEvent::Error("quota exceeded".to_string())]);
        assert!(summary.aborted);
    }

    #[test]
    fn test_default_event_type_is_message() {
        let (events, _) = feed_all(&["data: a\n\ndata: b\n\n"]);
        assert_eq!(events, vec![message("a"), message("b")]);
    }

    #[test]
    fn test_payload_kept_verbatim() {
        let (events, _) = feed_all(&["data:  leading and trailing  \n\n"]);
        assert_eq!(events, vec![message(" leading and trailing  ")]);
    }

    #[test]
    fn test_several_data_lines_in_one_block() {
        let (events, _) = feed_all(&["data: one\ndata: two\n\n"]);
        assert_eq!(events, vec![message("one"), message("two")]);
    }

    #[test]
    fn test_event_type_resets_between_blocks() {
        let mut parser = BlockParser::new();
        let frames = parser.push("event: delta\ndata: x\n\ndata: y\n\n");
        assert_eq!(
            frames,
            vec![
                StreamFrame::new("delta", "x"),
                StreamFrame::new("message", "y"),
            ]
        );
    }

    #[test]
    fn test_blank_event_name_falls_back_to_message() {
        let mut parser = BlockParser::new();
        let frames = parser.push("event:   \ndata: x\n\n");
        assert_eq!(frames, vec![StreamFrame::new("message", "x")]);
    }

    #[test]
    fn test_event_name_is_trimmed() {
        let mut parser = BlockParser::new();
        let frames = parser.push("event:  error \ndata: boom\n\n");
        assert_eq!(frames, vec![StreamFrame::new("error", "boom")]);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let (events, _) = feed_all(&[": keep-alive\nid: 7\nretry: 10\ndata: ok\ndata:no-space\n\n"]);
        assert_eq!(events, vec![message("ok")]);
    }

    #[test]
    fn test_error_wins_over_rest_of_block_and_later_blocks() {
        let (events, _) = feed_all(&[
            "data: before\n\n",
            "event: error\ndata: denied\ndata: ignored\n\ndata: after\n\n",
        ]);
        assert_eq!(
            events,
            vec![message("before"), StreamEvent::Error("denied".to_string())]
        );
    }

    #[test]
    fn test_feeding_after_abort_yields_nothing() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(b"event: error\ndata: x\n\n");
        assert!(decoder.is_aborted());
        assert!(decoder.feed(b"data: more\n\n").is_empty());
    }

    #[test]
    fn test_trailing_partial_block_discarded() {
        let (events, summary) = feed_all(&["data: done\n\n", "data: never termin", "ated"]);
        assert_eq!(events, vec![message("done")]);
        assert_eq!(summary.discarded_bytes, "data: never terminated".len());
        assert!(!summary.aborted);
    }

    #[test]
    fn test_single_newline_terminated_block_is_still_partial() {
        let (events, summary) = feed_all(&["data: almost\n"]);
        assert!(events.is_empty());
        assert_eq!(summary.discarded_bytes, "data: almost\n".len());
    }

    #[test]
    fn test_delimiter_split_across_fragments() {
        let (events, _) = feed_all(&["data: a\n", "\ndata: b\n", "\n"]);
        assert_eq!(events, vec![message("a"), message("b")]);
    }

    #[test]
    fn test_extra_newlines_between_blocks() {
        // "\n\n\n" splits into a block and a leading "\n" on the next one
        let (events, _) = feed_all(&["data: a\n\n\ndata: b\n\n"]);
        assert_eq!(events, vec![message("a"), message("b")]);
    }

    #[test]
    fn test_multibyte_character_split_between_fragments() {
        let bytes = "data: 日本\n\n".as_bytes();
        // Split inside the first character (3 bytes starting at offset 6)
        let mut decoder = StreamDecoder::new();
        let mut events = decoder.feed(&bytes[..7]);
        events.extend(decoder.feed(&bytes[7..]));
        assert_eq!(events, vec![message("日本")]);
    }

    #[test]
    fn test_long_block_in_single_byte_fragments() {
        let body = format!("data: {}\n\n", "x".repeat(4096));
        let mut decoder = StreamDecoder::new();
        let mut events = Vec::new();
        for byte in body.as_bytes() {
            events.extend(decoder.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(events, vec![message(&"x".repeat(4096))]);
    }

    #[test]
    fn test_delimiter_after_multibyte_tail() {
        let mut parser = BlockParser::new();
        assert!(parser.push("data: café").is_empty());
        assert!(parser.push("\n").is_empty());
        let frames = parser.push("\ndata: é");
        assert_eq!(frames, vec![StreamFrame::new(DEFAULT_EVENT_TYPE, "café")]);
        assert_eq!(parser.pending(), "data: é");
        assert_eq!(parser.push("\n\n").len(), 1);
    }

    #[test]
    fn test_empty_body_is_clean() {
        let summary = StreamDecoder::new().finish();
        assert_eq!(summary, DecoderSummary::default());
    }
}
