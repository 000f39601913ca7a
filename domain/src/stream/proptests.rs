//! Property tests for the stream decoder.

use proptest::prelude::*;
use proptest::sample::Index;

use super::{StreamDecoder, StreamEvent};

/// Payload text: no newlines, mixes 1- to 4-byte characters.
fn payload() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?:éß日本語😀]{0,12}"
}

fn event_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("message".to_string())),
        Just(Some("delta".to_string())),
    ]
}

/// A block with an optional non-error event line and 1..3 data lines.
fn block() -> impl Strategy<Value = (Option<String>, Vec<String>)> {
    (event_name(), prop::collection::vec(payload(), 1..3))
}

fn render(blocks: &[(Option<String>, Vec<String>)]) -> String {
    let mut body = String::new();
    for (event, lines) in blocks {
        if let Some(event) = event {
            body.push_str(&format!("event: {}\n", event));
        }
        for line in lines {
            body.push_str(&format!("data: {}\n", line));
        }
        body.push('\n');
    }
    body
}

/// Cut `bytes` at the given points (any byte offset, including inside a
/// character) and feed the pieces one at a time.
fn feed_split(bytes: &[u8], cuts: &[Index]) -> Vec<StreamEvent> {
    let mut points: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut decoder = StreamDecoder::new();
    let mut events = Vec::new();
    let mut start = 0;
    for point in points {
        events.extend(decoder.feed(&bytes[start..point]));
        start = point;
    }
    events.extend(decoder.feed(&bytes[start..]));
    events
}

fn feed_whole(bytes: &[u8]) -> Vec<StreamEvent> {
    StreamDecoder::new().feed(bytes)
}

proptest! {
    #[test]
    fn test_fragmentation_does_not_change_output(
        blocks in prop::collection::vec(block(), 0..6),
        cuts in prop::collection::vec(any::<Index>(), 0..10),
    ) {
        let body = render(&blocks);
        let whole = feed_whole(body.as_bytes());
        let split = feed_split(body.as_bytes(), &cuts);
        prop_assert_eq!(&split, &whole);

        let expected: Vec<StreamEvent> = blocks
            .iter()
            .flat_map(|(_, lines)| lines.iter().cloned().map(StreamEvent::Message))
            .collect();
        prop_assert_eq!(whole, expected);
    }

    #[test]
    fn test_multibyte_boundaries_decode_like_undivided(
        text in payload(),
        cut in any::<Index>(),
    ) {
        let body = format!("data: {}\n\n", text);
        let bytes = body.as_bytes();
        let events = feed_split(bytes, &[cut]);
        prop_assert_eq!(events, vec![StreamEvent::Message(text)]);
    }

    #[test]
    fn test_error_block_always_ends_the_stream(
        before in prop::collection::vec(block(), 0..4),
        message in payload(),
        noise in prop::collection::vec(payload(), 0..3),
        after in prop::collection::vec(block(), 0..4),
        cuts in prop::collection::vec(any::<Index>(), 0..10),
    ) {
        let mut body = render(&before);
        body.push_str(&format!("event: error\ndata: {}\n", message));
        for line in &noise {
            body.push_str(&format!("data: {}\n", line));
        }
        body.push('\n');
        body.push_str(&render(&after));

        let events = feed_split(body.as_bytes(), &cuts);

        let mut expected: Vec<StreamEvent> = before
            .iter()
            .flat_map(|(_, lines)| lines.iter().cloned().map(StreamEvent::Message))
            .collect();
        expected.push(StreamEvent::Error(message));
        prop_assert_eq!(events, expected);
    }

    #[test]
    fn test_unterminated_tail_is_dropped_quietly(
        blocks in prop::collection::vec(block(), 0..4),
        tail in payload(),
        cuts in prop::collection::vec(any::<Index>(), 0..6),
    ) {
        let body = format!("{}data: {}", render(&blocks), tail);
        let bytes = body.as_bytes();

        let mut points: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
        points.sort_unstable();
        points.dedup();

        let mut decoder = StreamDecoder::new();
        let mut events = Vec::new();
        let mut start = 0;
        for point in points {
            events.extend(decoder.feed(&bytes[start..point]));
            start = point;
        }
        events.extend(decoder.feed(&bytes[start..]));
        let summary = decoder.finish();

        let expected: Vec<StreamEvent> = blocks
            .iter()
            .flat_map(|(_, lines)| lines.iter().cloned().map(StreamEvent::Message))
            .collect();
        prop_assert_eq!(events, expected);
        prop_assert!(!summary.aborted);
        prop_assert_eq!(summary.discarded_bytes, "data: ".len() + tail.len());
    }
}
