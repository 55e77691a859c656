use encoding_rs::{Encoding, BIG5, GB18030, UTF_8};
use log::{debug, warn};

/// Decode subtitle bytes, trying strict UTF-8, GB18030 and Big5 in that
/// order. If none of them fit the bytes are read as UTF-8 with
/// replacement characters.
pub fn decode_text(bytes: &[u8]) -> (String, &'static Encoding) {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    for encoding in &[UTF_8, GB18030, BIG5] {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            debug!("Decoded input as {}", encoding.name());
            return (text.into_owned(), *encoding);
        }
    }

    warn!("Input is not valid UTF-8, GB18030 or Big5; decoding lossily");
    (String::from_utf8_lossy(bytes).into_owned(), UTF_8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8() {
        let (text, encoding) = decode_text("你好, world".as_bytes());
        assert_eq!(text, "你好, world");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn utf8_bom_is_dropped() {
        let (text, encoding) = decode_text(b"\xEF\xBB\xBFabc");
        assert_eq!(text, "abc");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn gb18030() {
        let (bytes, _, _) = GB18030.encode("中文字幕");
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(text, "中文字幕");
        assert_eq!(encoding, GB18030);
    }

    #[test]
    fn lossy_fallback() {
        // A lone lead byte at the end is invalid in every candidate.
        let (text, encoding) = decode_text(b"ok\x81");
        assert_eq!(encoding, UTF_8);
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('\u{FFFD}'));
    }
}
