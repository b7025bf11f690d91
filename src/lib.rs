//! `glyphscribe` - sprite atlas glyph rendering for plain text
//!
//! Renders text as a sequence of glyph images cut from a fixed-grid sprite
//! atlas, and keeps that rendering in step with a plain-text editor: a text
//! selection highlights the matching glyphs, and activating a glyph moves the
//! editor cursor onto its character.
//!
//! The pipeline for one pass:
//!
//! 1. [`glyph::map`] classifies each code point as a glyph or a line break.
//! 2. [`render::project`] resolves glyphs to atlas cells using an
//!    [`AtlasGeometry`], producing one [`VisualNode`] per offset.
//! 3. [`render::Layout`] positions the nodes and answers click hit tests.
//! 4. [`sync::SelectionSynchronizer`] mirrors selections both ways.
//!
//! [`Session`] owns all of it for a host.
//!
//! # Examples
//!
//! ```
//! use glyphscribe::{MemoryEditor, MemoryStore, SelectionRange, Session};
//! use glyphscribe::text::EditorSurface;
//!
//! let mut session = Session::restore(MemoryEditor::new(), MemoryStore::new());
//! session.editor_mut().type_text("Hi\nthere");
//! session.on_input();
//! assert_eq!(session.nodes().len(), 8);
//!
//! // Selecting "the" highlights three glyphs.
//! session.editor_mut().set_selection(SelectionRange::new(3, 6));
//! session.on_selection_changed();
//! assert_eq!(session.highlighted(), Some(SelectionRange::new(3, 6)));
//!
//! // Activating the last glyph puts the cursor on it.
//! assert_eq!(session.activate_glyph(7), Some(SelectionRange::new(7, 8)));
//! ```

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for pixel math
#![allow(clippy::module_name_repetitions)] // Allow atlas::AtlasGeometry etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::must_use_candidate)] // Accessors are obvious
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::float_cmp)] // Exact pixel values in tests

pub mod atlas;
pub mod error;
pub mod event;
pub mod glyph;
pub mod render;
pub mod session;
pub mod settings;
pub mod sync;
pub mod text;

// Re-export core types at crate root
pub use atlas::{AtlasCell, AtlasGeometry, GridShape, ImageResource};
pub use error::{Error, Result};
pub use glyph::Symbol;
pub use render::{NodeFlags, NodeKind, VisualNode};
pub use session::Session;
pub use settings::{KeyValueStore, MemoryStore, Settings};
pub use sync::{SelectionSynchronizer, SyncEvent};
pub use text::{MemoryEditor, SelectionRange, TextBuffer};
