//! Half-open selection ranges over code point offsets.

use std::ops::Range;

/// A half-open offset interval `[start, end)` into a text buffer.
///
/// `start == end` is a collapsed cursor and selects nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Create a selection, ordering the endpoints.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A collapsed cursor at `offset`.
    #[must_use]
    pub const fn collapsed(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// The one-character range `[offset, offset + 1)`.
    #[must_use]
    pub const fn single(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset.saturating_add(1),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Restrict the range to a buffer of `len` code points.
    #[must_use]
    pub fn clamp(&self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Offsets covered by the range.
    #[must_use]
    pub const fn offsets(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for SelectionRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
