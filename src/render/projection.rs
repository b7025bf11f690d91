//! Projection of symbols onto visual nodes.
//!
//! [`project`] is a pure function: the same symbols and geometry always give
//! the same node list. [`Projector`] wraps it into numbered passes, logs
//! diagnostics and notifies listeners.

use bitflags::bitflags;
use tracing::{debug, warn};

use crate::atlas::{AtlasCell, AtlasGeometry};
use crate::event::{SubscriptionId, Subscribers};
use crate::glyph::Symbol;
use crate::text::TextBuffer;

/// Prompt a view shows in place of an empty projection.
pub const PLACEHOLDER_PROMPT: &str = "Type some text, or drop an atlas image here";

/// Label a view shows for space glyphs.
pub const SPACE_LABEL: &str = "<SPACE>";

bitflags! {
    /// Presentation state of a visual node.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct NodeFlags: u8 {
        /// Glyph for the space character.
        const SPACE       = 0x01;
        /// Inside the current editor selection.
        const HIGHLIGHTED = 0x02;
        /// Character the atlas has no cell for.
        const UNMAPPED    = 0x04;
        /// Structural line break.
        const LINE_BREAK  = 0x08;
    }
}

/// What a visual node displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An atlas cell.
    Glyph { ch: char, cell: AtlasCell },
    /// Fallback for a character outside the atlas grid.
    Unmapped { ch: char },
    /// Line break; carries no glyph.
    LineBreak,
}

/// Rendered counterpart of one symbol, keyed by its buffer offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualNode {
    pub offset: usize,
    pub kind: NodeKind,
    pub flags: NodeFlags,
}

impl VisualNode {
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.flags.contains(NodeFlags::HIGHLIGHTED)
    }

    #[must_use]
    pub fn is_space(&self) -> bool {
        self.flags.contains(NodeFlags::SPACE)
    }

    #[must_use]
    pub const fn is_line_break(&self) -> bool {
        matches!(self.kind, NodeKind::LineBreak)
    }

    /// Tooltip / accessibility label.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            NodeKind::Glyph { ch: ' ', .. } => SPACE_LABEL.to_string(),
            NodeKind::Glyph { ch, .. } => ch.to_string(),
            NodeKind::Unmapped { ch } => format!("{ch} (U+{:04X}, not in atlas)", u32::from(ch)),
            NodeKind::LineBreak => String::new(),
        }
    }

    /// Atlas cell, for glyph nodes.
    #[must_use]
    pub const fn cell(&self) -> Option<AtlasCell> {
        match self.kind {
            NodeKind::Glyph { cell, .. } => Some(cell),
            _ => None,
        }
    }
}

fn project_symbol(symbol: Symbol, geometry: &AtlasGeometry) -> VisualNode {
    match symbol {
        Symbol::LineBreak { offset } => VisualNode {
            offset,
            kind: NodeKind::LineBreak,
            flags: NodeFlags::LINE_BREAK,
        },
        Symbol::Glyph { offset, ch } => match geometry.cell_of(u32::from(ch)) {
            Ok(cell) => VisualNode {
                offset,
                kind: NodeKind::Glyph { ch, cell },
                flags: if ch == ' ' {
                    NodeFlags::SPACE
                } else {
                    NodeFlags::empty()
                },
            },
            Err(_) => VisualNode {
                offset,
                kind: NodeKind::Unmapped { ch },
                flags: NodeFlags::UNMAPPED,
            },
        },
    }
}

/// Project symbols onto visual nodes, one node per symbol.
#[must_use]
pub fn project(symbols: &[Symbol], geometry: &AtlasGeometry) -> Vec<VisualNode> {
    symbols
        .iter()
        .map(|symbol| project_symbol(*symbol, geometry))
        .collect()
}

/// Output of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    /// Pass number, starting at 1.
    pub pass: u64,
    /// Buffer revision the pass was computed from.
    pub revision: u64,
    pub symbols: Vec<Symbol>,
    pub nodes: Vec<VisualNode>,
}

impl Projection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `offset`.
    #[must_use]
    pub fn node(&self, offset: usize) -> Option<&VisualNode> {
        self.nodes.get(offset)
    }

    /// Number of nodes the atlas could not draw.
    #[must_use]
    pub fn unmapped_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.flags.contains(NodeFlags::UNMAPPED))
            .count()
    }
}

/// Event emitted after every pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionEvent {
    Projected {
        pass: u64,
        nodes: usize,
        unmapped: usize,
    },
}

/// Runs passes and notifies listeners.
#[derive(Debug, Default)]
pub struct Projector {
    passes: u64,
    listeners: Subscribers<ProjectionEvent>,
}

impl Projector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ProjectionEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Convert the whole buffer in one pass.
    pub fn run(&mut self, buffer: &TextBuffer, geometry: &AtlasGeometry) -> Projection {
        self.passes += 1;
        let symbols = buffer.symbols();
        let nodes = project(&symbols, geometry);
        let projection = Projection {
            pass: self.passes,
            revision: buffer.revision(),
            symbols,
            nodes,
        };

        let unmapped = projection.unmapped_count();
        if unmapped > 0 {
            warn!(
                pass = projection.pass,
                unmapped,
                first = geometry.first_code_point(),
                last = ?geometry.last_code_point(),
                "characters outside the atlas grid rendered as fallback"
            );
        }
        debug!(
            pass = projection.pass,
            nodes = projection.nodes.len(),
            "projection pass"
        );

        self.listeners.notify(&ProjectionEvent::Projected {
            pass: projection.pass,
            nodes: projection.nodes.len(),
            unmapped,
        });
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::map;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ============================================
    // Projection
    // ============================================

    #[test]
    fn test_project_empty() {
        assert!(project(&[], &AtlasGeometry::default()).is_empty());
    }

    #[test]
    fn test_project_glyphs_and_breaks() {
        let nodes = project(&map("a\n "), &AtlasGeometry::default());
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[0].kind,
            NodeKind::Glyph {
                ch: 'a',
                cell: AtlasCell::new(1, 8)
            }
        );
        assert!(nodes[1].is_line_break());
        assert_eq!(nodes[1].flags, NodeFlags::LINE_BREAK);
        assert_eq!(nodes[2].cell(), Some(AtlasCell::new(0, 0)));
        assert!(nodes[2].is_space());
    }

    #[test]
    fn test_project_keeps_offsets() {
        let nodes = project(&map("xy\nz"), &AtlasGeometry::default());
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.offset, i);
        }
    }

    #[test]
    fn test_project_out_of_range_is_unmapped() {
        let nodes = project(&map("a中\t"), &AtlasGeometry::default());
        assert_eq!(nodes[1].kind, NodeKind::Unmapped { ch: '中' });
        assert!(nodes[1].flags.contains(NodeFlags::UNMAPPED));
        assert_eq!(nodes[2].kind, NodeKind::Unmapped { ch: '\t' });
        assert_eq!(nodes[1].cell(), None);
    }

    #[test]
    fn test_project_is_deterministic() {
        let symbols = map("Hello, World!\nÄÖÜ ß");
        let geometry = AtlasGeometry::default();
        assert_eq!(project(&symbols, &geometry), project(&symbols, &geometry));
    }

    #[test]
    fn test_labels() {
        let nodes = project(&map(" q\n中"), &AtlasGeometry::default());
        assert_eq!(nodes[0].label(), "<SPACE>");
        assert_eq!(nodes[1].label(), "q");
        assert_eq!(nodes[2].label(), "");
        assert!(nodes[3].label().contains("U+4E2D"));
    }

    // ============================================
    // Projector
    // ============================================

    #[test]
    fn test_projector_numbers_passes() {
        let mut projector = Projector::new();
        let geometry = AtlasGeometry::default();
        let mut buffer = TextBuffer::with_text("ab");
        let first = projector.run(&buffer, &geometry);
        buffer.insert(2, "c");
        let second = projector.run(&buffer, &geometry);
        assert_eq!(first.pass, 1);
        assert_eq!(second.pass, 2);
        assert_eq!(second.revision, 1);
        assert_eq!(second.nodes.len(), 3);
        assert_eq!(projector.passes(), 2);
    }

    #[test]
    fn test_projector_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut projector = Projector::new();
        let sink = Rc::clone(&events);
        projector.subscribe(move |e| sink.borrow_mut().push(*e));

        projector.run(&TextBuffer::with_text("a中"), &AtlasGeometry::default());
        assert_eq!(
            *events.borrow(),
            vec![ProjectionEvent::Projected {
                pass: 1,
                nodes: 2,
                unmapped: 1,
            }]
        );
    }
}
