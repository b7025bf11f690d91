//! Text storage, selection ranges and the host edit control boundary.
//!
//! Key types:
//!
//! - [`TextBuffer`]: rope-backed text addressed by code point offsets
//! - [`SelectionRange`]: half-open `[start, end)` offset interval
//! - [`EditorSurface`]: the host's plain-text control
//! - [`MemoryEditor`]: an in-memory [`EditorSurface`]
//!
//! # Examples
//!
//! ```
//! use glyphscribe::text::{EditorSurface, MemoryEditor, SelectionRange, scroll_to_offset};
//!
//! let mut editor = MemoryEditor::with_text("first\nsecond\nthird");
//! scroll_to_offset(&mut editor, 8);
//! assert_eq!(editor.scroll_line(), 1);
//! assert_eq!(editor.text(), "first\nsecond\nthird");
//!
//! editor.set_selection(SelectionRange::single(8));
//! assert_eq!(editor.selection().offsets(), 8..9);
//! ```

mod buffer;
mod editor;
mod rope;
mod selection;

pub use buffer::TextBuffer;
pub use editor::{EditorSurface, MemoryEditor, scroll_to_offset};
pub use rope::RopeWrapper;
pub use selection::SelectionRange;
