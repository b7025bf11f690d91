//! Plain text buffer addressed by code point offsets.
//!
//! Offsets handed out for a buffer are valid for one revision. Any edit bumps
//! the revision, after which a fresh symbol sequence has to be computed.

use crate::glyph::{self, Symbol};
use crate::text::rope::RopeWrapper;

/// Rope-backed text buffer.
#[derive(Clone, Debug, Default)]
pub struct TextBuffer {
    rope: RopeWrapper,
    revision: u64,
}

impl TextBuffer {
    /// Create an empty text buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            rope: RopeWrapper::from_str(text),
            revision: 0,
        }
    }

    /// Number of code points.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Revision counter, bumped on every edit.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, text: &str) {
        self.rope.replace(text);
        self.bump();
    }

    /// Insert text at a code point offset. Offsets past the end are ignored.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if offset <= self.len_chars() && !text.is_empty() {
            self.rope.insert(offset, text);
            self.bump();
        }
    }

    /// Remove a range of code points.
    pub fn remove(&mut self, range: std::ops::Range<usize>) {
        if range.start < range.end && range.start < self.len_chars() {
            self.rope.remove(range);
            self.bump();
        }
    }

    /// Classify every code point of the buffer.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        glyph::map_chars(self.rope.chars())
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_basic() {
        let buffer = TextBuffer::with_text("Hello\nworld");
        assert_eq!(buffer.len_chars(), 11);
        assert_eq!(buffer.len_lines(), 2);
        assert_eq!(buffer.text(), "Hello\nworld");
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_edits_bump_revision() {
        let mut buffer = TextBuffer::new();
        assert_eq!(buffer.revision(), 0);
        buffer.insert(0, "abc");
        assert_eq!(buffer.revision(), 1);
        buffer.remove(0..1);
        assert_eq!(buffer.text(), "bc");
        assert_eq!(buffer.revision(), 2);
        buffer.set_text("xyz");
        assert_eq!(buffer.revision(), 3);
    }

    #[test]
    fn test_noop_edits_keep_revision() {
        let mut buffer = TextBuffer::with_text("abc");
        buffer.insert(10, "x");
        buffer.insert(1, "");
        buffer.remove(2..2);
        buffer.remove(5..9);
        assert_eq!(buffer.revision(), 0);
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_symbols_follow_buffer() {
        let buffer = TextBuffer::with_text("a\nb");
        assert_eq!(buffer.symbols(), glyph::map("a\nb"));
    }
}
