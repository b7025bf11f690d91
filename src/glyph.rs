//! Text to symbol mapping.
//!
//! Every code point of the input becomes exactly one [`Symbol`] carrying its
//! offset, so `symbols[i].offset() == i` always holds. Line feeds become
//! [`Symbol::LineBreak`]; everything else, including the space character and
//! characters the atlas cannot draw, becomes [`Symbol::Glyph`]. The mapping
//! knows nothing about atlas geometry.

/// The per-offset classification of buffer content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    LineBreak { offset: usize },
    Glyph { offset: usize, ch: char },
}

impl Symbol {
    /// Offset of the code point this symbol was derived from.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::LineBreak { offset } | Self::Glyph { offset, .. } => *offset,
        }
    }

    #[must_use]
    pub const fn is_line_break(&self) -> bool {
        matches!(self, Self::LineBreak { .. })
    }

    /// Character of a glyph symbol.
    #[must_use]
    pub const fn ch(&self) -> Option<char> {
        match self {
            Self::Glyph { ch, .. } => Some(*ch),
            Self::LineBreak { .. } => None,
        }
    }
}

/// Classify a sequence of characters.
pub fn map_chars<I>(chars: I) -> Vec<Symbol>
where
    I: IntoIterator<Item = char>,
{
    chars
        .into_iter()
        .enumerate()
        .map(|(offset, ch)| {
            if ch == '\n' {
                Symbol::LineBreak { offset }
            } else {
                Symbol::Glyph { offset, ch }
            }
        })
        .collect()
}

/// Classify every code point of `text`.
#[must_use]
pub fn map(text: &str) -> Vec<Symbol> {
    map_chars(text.chars())
}
