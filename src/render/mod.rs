//! Visual nodes: projection, layout and hit testing.
//!
//! A pass turns the whole text buffer into a fresh list of [`VisualNode`]s,
//! one per code point, with `nodes[i].offset == i`. Nothing from a previous
//! pass is reused.

pub mod layout;
pub mod projection;

pub use layout::{Direction, Layout, LayoutParams, Placement, Rect, WritingMode};
pub use projection::{
    NodeFlags, NodeKind, PLACEHOLDER_PROMPT, Projection, ProjectionEvent, Projector, SPACE_LABEL,
    VisualNode, project,
};
