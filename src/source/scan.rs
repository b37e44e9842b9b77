//! Forward scanning of the decoded input for start tags.
//!
//! html5ever lowercases tag names before the tree sink sees them. To recover
//! the source spelling of an unknown element, [`StartTagScanner`] walks the
//! input alongside the parser and returns the text of the next real start
//! tag with a given name. It steps over the places where `<name` does not
//! open a tag: comments, doctypes and other markup declarations, attribute
//! values, and the contents of raw text and RCDATA elements.

use std::cell::Cell;

use memchr::{memchr, memmem};

/// Elements whose contents the tokenizer reads as text up to the matching
/// end tag (outside foreign content).
const TEXT_ELEMENTS: &[&[u8]] = &[
    b"script", b"style", b"xmp", b"iframe", b"noembed", b"noframes", b"textarea", b"title",
];

/// Resumable scanner over the parser's input.
///
/// Elements are created in source order, so each search continues where the
/// previous successful one stopped.
#[derive(Debug)]
pub struct StartTagScanner<'a> {
    source: &'a str,
    pos: Cell<usize>,
    /// Open `svg`/`math` elements at `pos`.
    foreign: Cell<usize>,
    scripting: bool,
}

/// A tag read from the input.
struct Tag<'s> {
    name: &'s [u8],
    /// Byte offset just past the closing `>`, or the input length.
    end: usize,
    self_closing: bool,
}

impl<'a> StartTagScanner<'a> {
    /// `scripting` decides whether `<noscript>` content is text.
    pub fn new(source: &'a str, scripting: bool) -> Self {
        Self {
            source,
            pos: Cell::new(0),
            foreign: Cell::new(0),
            scripting,
        }
    }

    /// Byte offset where the next search starts.
    pub fn position(&self) -> usize {
        self.pos.get()
    }

    /// Find the source text of the next start tag named `name`, compared
    /// ASCII case-insensitively.
    ///
    /// On success the scanner moves past the returned tag. On failure it
    /// stays where it was.
    pub fn next_start_tag(&self, name: &str) -> Option<&'a str> {
        let bytes = self.source.as_bytes();
        let name = name.as_bytes();
        let mut pos = self.pos.get();
        let mut foreign = self.foreign.get();

        while let Some(offset) = bytes.get(pos..).and_then(|rest| memchr(b'<', rest)) {
            let open = pos + offset;
            match bytes.get(open + 1) {
                Some(b'!') => pos = skip_declaration(bytes, open, foreign > 0),
                Some(b'?') => pos = skip_past(bytes, open + 2, b'>'),
                Some(b'/') => match bytes.get(open + 2) {
                    Some(b) if b.is_ascii_alphabetic() => {
                        let tag = read_tag(bytes, open + 2);
                        if is_foreign_root(tag.name) {
                            foreign = foreign.saturating_sub(1);
                        }
                        pos = tag.end;
                    }
                    _ => pos = skip_past(bytes, open + 2, b'>'),
                },
                Some(b) if b.is_ascii_alphabetic() => {
                    let tag = read_tag(bytes, open + 1);
                    if tag.name.eq_ignore_ascii_case(name) {
                        self.pos.set(tag.end);
                        self.foreign.set(foreign);
                        return Some(&self.source[open..tag.end]);
                    }
                    pos = tag.end;
                    if is_foreign_root(tag.name) {
                        if !tag.self_closing {
                            foreign += 1;
                        }
                    } else if foreign == 0 {
                        pos = self.skip_contents(bytes, pos, tag.name);
                    }
                }
                _ => pos = open + 1,
            }
        }
        None
    }

    /// Skip the body of a raw text, RCDATA or plaintext element that starts
    /// at `from`. Other elements have no text body and are left alone.
    fn skip_contents(&self, bytes: &[u8], from: usize, name: &[u8]) -> usize {
        if name.eq_ignore_ascii_case(b"plaintext") {
            return bytes.len();
        }
        let is_text = TEXT_ELEMENTS.iter().any(|t| name.eq_ignore_ascii_case(t))
            || (self.scripting && name.eq_ignore_ascii_case(b"noscript"));
        if !is_text {
            return from;
        }

        let mut pos = from;
        while let Some(offset) = bytes.get(pos..).and_then(|rest| memmem::find(rest, b"</")) {
            let start = pos + offset + 2;
            let end = start + name.len();
            let matches = bytes
                .get(start..end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name));
            if matches && bytes.get(end).is_none_or(|&b| is_space(b) || b == b'/' || b == b'>') {
                return pos + offset;
            }
            pos = start;
        }
        bytes.len()
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0c' | b'\r')
}

fn is_foreign_root(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"svg") || name.eq_ignore_ascii_case(b"math")
}

/// Offset just past the next `needle` at or after `from`.
fn skip_past(bytes: &[u8], from: usize, needle: u8) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| memchr(needle, rest))
        .map_or(bytes.len(), |i| from + i + 1)
}

/// Skip `<!...`: a comment, a CDATA section in foreign content, or a bogus
/// comment such as a doctype.
fn skip_declaration(bytes: &[u8], open: usize, in_foreign: bool) -> usize {
    let rest = &bytes[open..];
    if rest.starts_with(b"<!--") {
        let body = open + 4;
        let tail = &bytes[body..];
        // `<!-->` and `<!--->` are complete (empty) comments.
        if tail.starts_with(b">") {
            return body + 1;
        }
        if tail.starts_with(b"->") {
            return body + 2;
        }
        return memmem::find(tail, b"-->").map_or(bytes.len(), |i| body + i + 3);
    }
    if in_foreign && rest.starts_with(b"<![CDATA[") {
        let body = open + 9;
        return memmem::find(&bytes[body..], b"]]>").map_or(bytes.len(), |i| body + i + 3);
    }
    skip_past(bytes, open + 2, b'>')
}

/// Read a start or end tag whose name begins at `name_start`, stepping over
/// attributes so that `>` inside quoted values does not end the tag.
fn read_tag(bytes: &[u8], name_start: usize) -> Tag<'_> {
    let mut i = name_start;
    while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'/' && bytes[i] != b'>' {
        i += 1;
    }
    let name = &bytes[name_start..i];

    let mut slash = false;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'>' => {
                return Tag {
                    name,
                    end: i + 1,
                    self_closing: slash,
                };
            }
            b'/' => {
                slash = true;
                i += 1;
            }
            b if is_space(b) => {
                slash = false;
                i += 1;
            }
            _ => {
                slash = false;
                i = skip_attribute(bytes, i);
            }
        }
    }
    Tag {
        name,
        end: bytes.len(),
        self_closing: false,
    }
}

/// Skip one attribute starting at `start`; returns where the tokenizer
/// would look for the next one.
fn skip_attribute(bytes: &[u8], start: usize) -> usize {
    // The first character belongs to the name even if it is `=`.
    let mut i = start + 1;
    while i < bytes.len() && !is_space(bytes[i]) && !matches!(bytes[i], b'/' | b'>' | b'=') {
        i += 1;
    }
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return i;
    }

    i += 1;
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    match bytes.get(i) {
        Some(&quote @ (b'"' | b'\'')) => skip_past(bytes, i + 1, quote),
        _ => {
            while i < bytes.len() && !is_space(bytes[i]) && bytes[i] != b'>' {
                i += 1;
            }
            i
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_tags_in_order() {
        let scanner = StartTagScanner::new("<x-a></x-a><X-A class=b>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a>"));
        assert_eq!(scanner.next_start_tag("x-a"), Some("<X-A class=b>"));
        assert_eq!(scanner.next_start_tag("x-a"), None);
    }

    #[test]
    fn test_name_must_end_at_delimiter() {
        let scanner = StartTagScanner::new("<x-ab><x-a/>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a/>"));
    }

    #[test]
    fn test_unterminated_tag_runs_to_end() {
        let scanner = StartTagScanner::new("<x-a id=1", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a id=1"));
    }

    #[test]
    fn test_failed_search_keeps_position() {
        let scanner = StartTagScanner::new("<x-a><x-b>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a>"));
        let pos = scanner.position();
        assert_eq!(scanner.next_start_tag("x-z"), None);
        assert_eq!(scanner.position(), pos);
        assert_eq!(scanner.next_start_tag("x-b"), Some("<x-b>"));
    }

    #[test]
    fn test_skips_comments() {
        let scanner = StartTagScanner::new("<!-- <X-A> --><x-a>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a>"));

        let scanner = StartTagScanner::new("<!--><X-A>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<X-A>"));
    }

    #[test]
    fn test_skips_declarations_and_processing_instructions() {
        let scanner = StartTagScanner::new("<!DOCTYPE html><?x <X-A>?><x-a>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a>"));
    }

    #[test]
    fn test_skips_attribute_values() {
        let scanner = StartTagScanner::new(r#"<p title="<X-B>" alt='<X-B>'></p><x-b>"#, true);
        assert_eq!(scanner.next_start_tag("x-b"), Some("<x-b>"));
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let scanner = StartTagScanner::new(r#"<x-a title="a>b" id=c>"#, true);
        assert_eq!(scanner.next_start_tag("x-a"), Some(r#"<x-a title="a>b" id=c>"#));
    }

    #[test]
    fn test_skips_raw_text_and_rcdata() {
        let src = "<script>'<X-A>'</script><textarea><X-A></TEXTAREA><title><X-A></title><x-a>";
        let scanner = StartTagScanner::new(src, true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a>"));
    }

    #[test]
    fn test_raw_text_end_needs_full_name() {
        let scanner = StartTagScanner::new("<style></styles><X-A></style><x-a>", true);
        assert_eq!(scanner.next_start_tag("x-a"), Some("<x-a>"));
    }

    #[test]
    fn test_noscript_depends_on_scripting() {
        let src = "<noscript><X-A></noscript><x-a>";
        assert_eq!(StartTagScanner::new(src, true).next_start_tag("x-a"), Some("<x-a>"));
        assert_eq!(StartTagScanner::new(src, false).next_start_tag("x-a"), Some("<X-A>"));
    }

    #[test]
    fn test_foreign_content_is_not_raw_text() {
        let src = "<svg><style><clipPath id=a></style></svg><title><clippath></title>";
        let scanner = StartTagScanner::new(src, true);
        assert_eq!(scanner.next_start_tag("clippath"), Some("<clipPath id=a>"));
        assert_eq!(scanner.next_start_tag("clippath"), None);
    }

    #[test]
    fn test_plaintext_runs_to_end() {
        let scanner = StartTagScanner::new("<plaintext><x-a>", true);
        assert_eq!(scanner.next_start_tag("x-a"), None);
    }
}
