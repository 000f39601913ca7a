//! Incremental UTF-8 decoding.

use encoding_rs::{CoderResult, Decoder, UTF_8};

/// Stateful UTF-8 decoder for a byte stream delivered in fragments.
///
/// A multi-byte character split across two fragments is held back until its
/// remaining bytes arrive. Malformed input decodes to U+FFFD, the way a
/// browser `TextDecoder` does.
pub struct Utf8Decoder {
    inner: Decoder,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self {
            inner: UTF_8.new_decoder_with_bom_removal(),
        }
    }

    /// Decode the next fragment, returning all text that is complete so far.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.run(bytes, false)
    }

    /// Flush held-back bytes at end of stream.
    ///
    /// An incomplete trailing sequence becomes U+FFFD.
    pub fn finish(mut self) -> String {
        self.run(&[], true)
    }

    fn run(&mut self, mut src: &[u8], last: bool) -> String {
        let mut out = String::new();
        loop {
            let needed = self
                .inner
                .max_utf8_buffer_length(src.len())
                .unwrap_or_else(|| src.len().saturating_mul(3).saturating_add(4));
            out.reserve(needed);

            let (result, read, _) = self.inner.decode_to_string(src, &mut out, last);
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => return out,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Utf8Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utf8Decoder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
    }

    #[test]
    fn test_split_character_is_held_back() {
        // "é" is 0xC3 0xA9
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"caf\xC3"), "caf");
        assert_eq!(decoder.decode(b"\xA9!"), "é!");
    }

    #[test]
    fn test_four_byte_character_split_three_ways() {
        let bytes = "😀".as_bytes();
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.decode(&bytes[1..3]), "");
        assert_eq!(decoder.decode(&bytes[3..]), "😀");
    }

    #[test]
    fn test_invalid_byte_becomes_replacement() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_finish_flushes_truncated_sequence() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"x\xE6\x97"), "x");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn test_empty_fragment_is_harmless() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b""), "");
        assert_eq!(decoder.decode("日本".as_bytes()), "日本");
    }
}
