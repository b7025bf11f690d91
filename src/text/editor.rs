//! The plain-text edit control on the host side.
//!
//! [`EditorSurface`] is the boundary to whatever text control the host
//! provides. [`MemoryEditor`] implements it over a [`TextBuffer`] for headless
//! hosts and tests.

use tracing::trace;

use crate::text::TextBuffer;
use crate::text::selection::SelectionRange;

/// A plain-text edit control owned by the host.
pub trait EditorSurface {
    /// Full current content.
    fn text(&self) -> String;

    /// Content length in code points.
    fn len_chars(&self) -> usize {
        self.text().chars().count()
    }

    /// Current selection.
    fn selection(&self) -> SelectionRange;

    /// Set the selection without notifying the host's listeners.
    fn set_selection(&mut self, range: SelectionRange);

    /// Give the control input focus. Hosts only draw a selection in a focused control.
    fn focus(&mut self);

    /// Scroll as far down as the current content allows.
    fn scroll_to_end(&mut self);

    /// Replace the content without firing a change notification.
    fn replace_text_silently(&mut self, text: &str);
}

/// Restores the editor content when dropped.
struct TruncationGuard<'a, E: EditorSurface + ?Sized> {
    surface: &'a mut E,
    original: String,
}

impl<E: EditorSurface + ?Sized> Drop for TruncationGuard<'_, E> {
    fn drop(&mut self) {
        self.surface.replace_text_silently(&self.original);
    }
}

/// Scroll `surface` so that `offset` is in view.
///
/// The content is cut to `offset` code points, scrolled to the end, then put
/// back. Restoring the content leaves the scroll position where it is, and no
/// change notification fires for either replacement.
pub fn scroll_to_offset<E: EditorSurface + ?Sized>(surface: &mut E, offset: usize) {
    let original = surface.text();
    let prefix: String = original.chars().take(offset).collect();
    trace!(offset, "scrolling editor to offset");
    let mut guard = TruncationGuard { surface, original };
    guard.surface.replace_text_silently(&prefix);
    guard.surface.scroll_to_end();
}

/// In-memory edit control.
///
/// Scroll position is tracked as the first visible line. `change_count`
/// counts the change notifications a real control would have fired, which
/// only user edits produce.
#[derive(Clone, Debug, Default)]
pub struct MemoryEditor {
    buffer: TextBuffer,
    selection: SelectionRange,
    focused: bool,
    scroll_line: usize,
    change_count: u64,
}

impl MemoryEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: TextBuffer::with_text(text),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    #[must_use]
    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    /// Type `text` at the cursor, replacing the selection, as a user would.
    pub fn type_text(&mut self, text: &str) {
        let sel = self.selection.clamp(self.buffer.len_chars());
        self.buffer.remove(sel.offsets());
        self.buffer.insert(sel.start, text);
        let cursor = sel.start + text.chars().count();
        self.selection = SelectionRange::collapsed(cursor);
        self.change_count += 1;
    }

    /// Delete the selection, or the character before a collapsed cursor.
    pub fn delete_backward(&mut self) {
        let sel = self.selection.clamp(self.buffer.len_chars());
        let range = if sel.is_empty() {
            if sel.start == 0 {
                return;
            }
            sel.start - 1..sel.start
        } else {
            sel.offsets()
        };
        let start = range.start;
        self.buffer.remove(range);
        self.selection = SelectionRange::collapsed(start);
        self.change_count += 1;
    }

    /// Replace the whole content as a user paste would.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.selection = SelectionRange::collapsed(self.buffer.len_chars());
        self.change_count += 1;
    }
}

impl EditorSurface for MemoryEditor {
    fn text(&self) -> String {
        self.buffer.text()
    }

    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, range: SelectionRange) {
        self.selection = range.clamp(self.buffer.len_chars());
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn scroll_to_end(&mut self) {
        self.scroll_line = self.buffer.len_lines().saturating_sub(1);
    }

    fn replace_text_silently(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.selection = self.selection.clamp(self.buffer.len_chars());
    }
}
