//! Text decoding for content sniffing.
//!
//! Only a bounded prefix of the buffer is decoded. A UTF-8 or UTF-16 byte
//! order mark selects the decoder; everything else is read as UTF-8. Invalid
//! sequences become U+FFFD, so any binary input decodes without error.

use std::borrow::Cow;

use encoding_rs::UTF_8;
use tracing::trace;

/// Decode at most `limit` leading bytes of `buffer` as text.
///
/// # Examples
///
/// ```
/// use filesniff::common::encoding::decode_prefix;
///
/// assert_eq!(decode_prefix(b"hello world", 5), "hello");
/// assert_eq!(decode_prefix(b"\xEF\xBB\xBFhi", 100), "hi");
/// assert_eq!(decode_prefix(&[0x68, 0xFF, 0x69], 100), "h\u{FFFD}i");
/// ```
pub fn decode_prefix(buffer: &[u8], limit: usize) -> Cow<'_, str> {
    let prefix = &buffer[..buffer.len().min(limit)];
    let (text, encoding, had_errors) = UTF_8.decode(prefix);
    if had_errors {
        trace!(encoding = encoding.name(), "lossy decode of sniffed prefix");
    }
    text
}
