//! Bidirectional selection synchronization between the editor and the glyphs.
//!
//! Two transitions:
//!
//! - Selection to highlight: the editor's selection `[start, end)` becomes
//!   the set of highlighted nodes, and the first one is scrolled into view.
//! - Click to cursor: activating the glyph at offset `o` selects `[o, o + 1)`
//!   in the editor, focuses it, scrolls it to `o`, then runs the first
//!   transition for the new selection.
//!
//! The only state kept is the highlighted range, which always mirrors the
//! editor's selection as of the last transition.

use tracing::{debug, trace};

use crate::event::{SubscriptionId, Subscribers};
use crate::render::{NodeFlags, VisualNode};
use crate::text::{EditorSurface, SelectionRange, scroll_to_offset};

/// How a view should scroll a node into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Events emitted by the synchronizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    /// The highlighted range changed. `None` means nothing is highlighted.
    HighlightChanged { range: Option<SelectionRange> },
    /// Center the node at `offset` in the glyph view.
    ScrollIntoView {
        offset: usize,
        behavior: ScrollBehavior,
    },
    /// The editor cursor was placed on `offset` from a glyph activation.
    CursorPlaced { offset: usize },
}

/// Clear every highlight mark, then mark the nodes inside `range`.
///
/// An empty or reversed range marks nothing.
pub fn mark_highlighted(nodes: &mut [VisualNode], range: Option<SelectionRange>) {
    for node in nodes.iter_mut() {
        node.flags.remove(NodeFlags::HIGHLIGHTED);
    }
    let Some(range) = range.map(|r| r.clamp(nodes.len())) else {
        return;
    };
    if range.is_empty() {
        return;
    }
    for node in &mut nodes[range.offsets()] {
        node.flags.insert(NodeFlags::HIGHLIGHTED);
    }
}

/// Keeps glyph highlights and the editor selection in step.
#[derive(Debug, Default)]
pub struct SelectionSynchronizer {
    highlighted: Option<SelectionRange>,
    listeners: Subscribers<SyncEvent>,
}

impl SelectionSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SyncEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Currently highlighted range, `None` when nothing is highlighted.
    #[must_use]
    pub fn highlighted(&self) -> Option<SelectionRange> {
        self.highlighted
    }

    #[must_use]
    pub fn is_highlighted(&self, offset: usize) -> bool {
        self.highlighted.is_some_and(|r| r.contains(offset))
    }

    /// Highlighted offsets in ascending order.
    pub fn highlighted_offsets(&self) -> impl Iterator<Item = usize> {
        self.highlighted.map(|r| r.offsets()).into_iter().flatten()
    }

    fn apply(&mut self, range: SelectionRange, nodes: &mut [VisualNode]) -> Option<SelectionRange> {
        let clamped = range.clamp(nodes.len());
        let highlighted = (!clamped.is_empty()).then_some(clamped);
        mark_highlighted(nodes, highlighted);
        self.highlighted = highlighted;
        self.listeners
            .notify(&SyncEvent::HighlightChanged { range: highlighted });
        highlighted
    }

    /// Mirror an editor selection onto the nodes.
    ///
    /// A non-empty selection scrolls its first node into view. A collapsed
    /// cursor clears all highlights and does not scroll. Returns the offset
    /// scrolled to.
    pub fn on_selection_changed(
        &mut self,
        range: SelectionRange,
        nodes: &mut [VisualNode],
    ) -> Option<usize> {
        trace!(start = range.start, end = range.end, "editor selection changed");
        let first = self.apply(range, nodes)?.start;
        self.listeners.notify(&SyncEvent::ScrollIntoView {
            offset: first,
            behavior: ScrollBehavior::Smooth,
        });
        Some(first)
    }

    /// Mirror an editor selection onto the nodes of a fresh pass, without scrolling.
    pub fn refresh(&mut self, range: SelectionRange, nodes: &mut [VisualNode]) {
        self.apply(range, nodes);
    }

    /// Place the editor cursor on the glyph at `offset`.
    ///
    /// Line breaks and offsets past the last node are ignored. Returns the
    /// editor selection afterwards.
    pub fn activate<E: EditorSurface + ?Sized>(
        &mut self,
        offset: usize,
        editor: &mut E,
        nodes: &mut [VisualNode],
    ) -> Option<SelectionRange> {
        match nodes.get(offset) {
            Some(node) if !node.is_line_break() => {}
            _ => {
                debug!(offset, "ignoring activation of a non-glyph node");
                return None;
            }
        }

        scroll_to_offset(editor, offset);
        editor.focus();
        editor.set_selection(SelectionRange::single(offset));
        self.listeners.notify(&SyncEvent::CursorPlaced { offset });

        let selection = editor.selection();
        self.on_selection_changed(selection, nodes);
        Some(selection)
    }
}
