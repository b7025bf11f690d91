//! End-to-end interaction flows through a [`Session`].
//!
//! Each test drives the session the way a host would: edit the editor, then
//! forward the event; click the glyph view; drop an atlas image.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use glyphscribe::atlas::ImageResource;
use glyphscribe::render::{NodeKind, PLACEHOLDER_PROMPT, ProjectionEvent, WritingMode};
use glyphscribe::settings::keys;
use glyphscribe::sync::{ScrollBehavior, SyncEvent};
use glyphscribe::text::EditorSurface;
use glyphscribe::{
    Error, KeyValueStore, MemoryEditor, MemoryStore, NodeFlags, SelectionRange, Session,
};
use serde::Serialize;
use tracing::info;

fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

fn session_with(text: &str) -> Session<MemoryEditor, MemoryStore> {
    setup_test_logging();
    let mut store = MemoryStore::new();
    store.set(keys::PLAINTEXT, text);
    Session::restore(MemoryEditor::new(), store)
}

fn highlighted_offsets(session: &Session<MemoryEditor, MemoryStore>) -> Vec<usize> {
    session
        .nodes()
        .iter()
        .filter(|n| n.is_highlighted())
        .map(|n| n.offset)
        .collect()
}

fn png(width: u32, height: u32) -> ImageResource {
    ImageResource::new("image/png", "data:image/png;base64,iVBORw0KGgo=", width, height)
}

#[derive(Serialize)]
struct NodeSnapshot {
    column: Option<u32>,
    label: String,
    offset: usize,
    row: Option<u32>,
}

// ============================================================================
// Typing and Projection
// ============================================================================

#[test]
fn test_projection_snapshot() {
    let session = session_with("A \nb");
    let snapshot: Vec<NodeSnapshot> = session
        .nodes()
        .iter()
        .map(|n| NodeSnapshot {
            column: n.cell().map(|c| c.column),
            label: n.label(),
            offset: n.offset,
            row: n.cell().map(|c| c.row),
        })
        .collect();
    insta::assert_json_snapshot!(snapshot, @r#"
    [
      {
        "column": 1,
        "label": "A",
        "offset": 0,
        "row": 4
      },
      {
        "column": 0,
        "label": "<SPACE>",
        "offset": 1,
        "row": 0
      },
      {
        "column": null,
        "label": "",
        "offset": 2,
        "row": null
      },
      {
        "column": 2,
        "label": "b",
        "offset": 3,
        "row": 8
      }
    ]
    "#);
}

#[test]
fn test_typing_reprojects_every_edit() {
    let mut session = session_with("");
    assert!(session.is_empty());
    assert!(!PLACEHOLDER_PROMPT.is_empty());

    let passes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&passes);
    session.on_projection(move |e| {
        let ProjectionEvent::Projected { pass, nodes, .. } = *e;
        sink.borrow_mut().push((pass, nodes));
    });

    for ch in ["H", "i", "\n", "!"] {
        session.editor_mut().type_text(ch);
        session.on_input();
    }
    info!(passes = ?passes.borrow(), "typed");
    assert_eq!(*passes.borrow(), vec![(2, 1), (3, 2), (4, 3), (5, 4)]);
    assert!(session.nodes()[2].is_line_break());

    session.editor_mut().delete_backward();
    session.on_input();
    assert_eq!(session.nodes().len(), 3);
    assert_eq!(
        session.store().get(keys::PLAINTEXT).as_deref(),
        Some("Hi\n")
    );
}

#[test]
fn test_out_of_range_characters_render_as_fallback() {
    let session = session_with("ß中");
    let nodes = session.nodes();
    assert!(matches!(nodes[0].kind, NodeKind::Glyph { ch: 'ß', .. }));
    assert_eq!(nodes[1].kind, NodeKind::Unmapped { ch: '中' });
    assert!(nodes[1].flags.contains(NodeFlags::UNMAPPED));
    assert_eq!(session.projection().unmapped_count(), 1);
}

// ============================================================================
// Selection Sync
// ============================================================================

#[test]
fn test_selection_then_click_flow() {
    let mut session = session_with("secret\ncode");
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.on_sync(move |e| sink.borrow_mut().push(*e));

    session
        .editor_mut()
        .set_selection(SelectionRange::new(1, 4));
    assert_eq!(session.on_selection_changed(), Some(1));
    assert_eq!(highlighted_offsets(&session), vec![1, 2, 3]);

    let selection = session.activate_glyph(9);
    assert_eq!(selection, Some(SelectionRange::new(9, 10)));
    assert_eq!(highlighted_offsets(&session), vec![9]);
    assert!(session.editor().is_focused());
    assert_eq!(session.editor().scroll_line(), 1);
    assert_eq!(session.editor().change_count(), 0);

    assert!(events.borrow().contains(&SyncEvent::CursorPlaced { offset: 9 }));
    assert_eq!(
        events.borrow().last(),
        Some(&SyncEvent::ScrollIntoView {
            offset: 9,
            behavior: ScrollBehavior::Smooth
        })
    );
}

#[test]
fn test_collapsed_cursor_clears_highlights() {
    let mut session = session_with("abc");
    session.editor_mut().set_selection(SelectionRange::new(0, 3));
    session.on_selection_changed();
    session.editor_mut().set_selection(SelectionRange::collapsed(2));
    assert_eq!(session.on_selection_changed(), None);
    assert!(highlighted_offsets(&session).is_empty());
}

#[test]
fn test_edit_invalidates_highlight() {
    let mut session = session_with("abcdef");
    session.editor_mut().set_selection(SelectionRange::new(2, 5));
    session.on_selection_changed();

    session.editor_mut().type_text("X");
    session.on_input();
    assert_eq!(session.highlighted(), None);
    assert!(highlighted_offsets(&session).is_empty());
}

#[test]
fn test_click_at_pixel() {
    let mut session = session_with("ab\ncd");
    // Default glyph box is 44 x 28 pixels.
    assert_eq!(session.click_at(50.0, 10.0), Some(SelectionRange::new(1, 2)));
    assert_eq!(session.click_at(10.0, 40.0), Some(SelectionRange::new(3, 4)));
    assert_eq!(session.click_at(500.0, 500.0), None);
    assert_eq!(session.editor().selection(), SelectionRange::new(3, 4));
}

#[test]
fn test_unbalanced_input_lays_out_and_clicks() {
    let mut session = session_with("");
    let n = 20_000;
    let text = format!("{}{}", "\n".repeat(n), "a".repeat(n));
    session.editor_mut().type_text(&text);
    session.on_input();
    assert_eq!(session.layout().line_count(), n + 1);

    let last = 2 * n - 1;
    let rect = session.layout().placement(last).unwrap().rect;
    assert_eq!(
        session.click_at(rect.x + 1.0, rect.y + 1.0),
        Some(SelectionRange::new(last, last + 1))
    );
    assert_eq!(session.click_at(rect.x + 1.0, 1.0), None);
}

#[test]
fn test_click_follows_writing_mode() {
    let mut session = session_with("ab\ncd");
    session.set_writing_mode(WritingMode::VerticalRl);
    // Lines run top to bottom, first line on the right.
    assert_eq!(session.click_at(50.0, 10.0), Some(SelectionRange::new(0, 1)));
    assert_eq!(session.click_at(10.0, 40.0), Some(SelectionRange::new(4, 5)));
}

// ============================================================================
// Atlas Ingestion
// ============================================================================

#[test]
fn test_ingest_atlas_recalibrates_and_persists() {
    let mut session = session_with("hi");
    let pass = session.projection().pass;

    session.ingest_atlas(&png(160, 288)).unwrap();
    assert_eq!(session.geometry().cell_width(), 20);
    assert_eq!(session.geometry().cell_height(), 12);
    assert_eq!(session.projection().pass, pass + 1);
    assert_eq!(session.view_params().background_width, 640.0);

    let store = session.store();
    assert_eq!(store.get(keys::CELL_WIDTH).as_deref(), Some("20"));
    assert_eq!(store.get(keys::CELL_HEIGHT).as_deref(), Some("12"));
    assert_eq!(store.get(keys::IMAGE_WIDTH).as_deref(), Some("160px"));
    assert!(store.get(keys::IMAGE).unwrap().starts_with("data:image/png"));
}

#[test]
fn test_rejected_atlas_changes_nothing() {
    let mut session = session_with("hi");
    let geometry = *session.geometry();
    let pass = session.projection().pass;

    let err = session.ingest_atlas(&png(81, 144)).unwrap_err();
    assert!(matches!(err, Error::GeometryRejected { .. }));
    let err = session
        .ingest_atlas(&ImageResource::new("image/jpeg", "data:", 80, 144))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedResource(_)));

    assert_eq!(*session.geometry(), geometry);
    assert_eq!(session.projection().pass, pass);
    assert!(session.store().get(keys::IMAGE).is_none());
}

#[test]
fn test_restore_after_calibration() {
    let mut session = session_with("x");
    session.ingest_atlas(&png(160, 288)).unwrap();
    session.set_writing_mode(WritingMode::VerticalLr);

    let store = session.store().clone();
    let restored = Session::restore(MemoryEditor::new(), store);
    assert_eq!(restored.geometry().cell_width(), 20);
    assert_eq!(restored.settings().writing_mode, WritingMode::VerticalLr);
    assert_eq!(restored.editor().text(), "x");
    assert_eq!(restored.settings().image.width, 160);
}
