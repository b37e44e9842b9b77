//! Byte decoding helpers.

use std::borrow::Cow;

/// Decode input bytes as UTF-8.
///
/// A leading byte order mark is stripped and malformed sequences become
/// U+FFFD, matching how an HTML5 parser treats UTF-8 input. No other
/// encodings are detected. Uses `Cow<str>` to avoid allocation when the
/// input is already valid.
pub fn decode_utf8(bytes: &[u8]) -> Cow<'_, str> {
    let (result, malformed) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if malformed {
        tracing::debug!(len = bytes.len(), "input contained malformed UTF-8");
    }
    result
}
