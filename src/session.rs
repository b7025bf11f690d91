//! The context object tying the editor, the atlas and the glyph view together.
//!
//! A [`Session`] is built once by the host and receives every interaction
//! event. Each entry point runs to completion before returning; there is no
//! shared or global state.

use tracing::{debug, info};

use crate::atlas::{
    AtlasGeometry, CellStyleTable, GridShape, ImageResource, ViewParams, calibrate_image,
};
use crate::error::Result;
use crate::event::SubscriptionId;
use crate::render::{
    Direction, Layout, Projection, ProjectionEvent, Projector, VisualNode, WritingMode,
};
use crate::settings::{KeyValueStore, Settings, keys, validate_line_height};
use crate::sync::{SelectionSynchronizer, SyncEvent};
use crate::text::{EditorSurface, SelectionRange, TextBuffer};

/// Editor, settings store, atlas geometry and the current pass.
pub struct Session<E: EditorSurface, S: KeyValueStore> {
    editor: E,
    store: S,
    settings: Settings,
    geometry: AtlasGeometry,
    buffer: TextBuffer,
    projector: Projector,
    projection: Projection,
    layout: Layout,
    sync: SelectionSynchronizer,
}

impl<E: EditorSurface, S: KeyValueStore> Session<E, S> {
    /// Restore options from `store`, seed the editor with the saved text and run the first pass.
    pub fn restore(mut editor: E, store: S) -> Self {
        let settings = Settings::load(&store);
        let geometry = settings.geometry();
        editor.replace_text_silently(&settings.plaintext);
        let buffer = TextBuffer::with_text(&settings.plaintext);
        info!(
            chars = buffer.len_chars(),
            cell_width = geometry.cell_width(),
            cell_height = geometry.cell_height(),
            "session restored"
        );

        let mut session = Self {
            editor,
            store,
            settings,
            geometry,
            buffer,
            projector: Projector::new(),
            projection: Projection::default(),
            layout: Layout::default(),
            sync: SelectionSynchronizer::new(),
        };
        session.run_pass();
        session
    }

    // ============================================
    // Accessors
    // ============================================

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Mutable access for the host to apply user edits before calling [`Self::on_input`].
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn geometry(&self) -> &AtlasGeometry {
        &self.geometry
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.projection.nodes
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Whether the view should show its placeholder prompt.
    pub fn is_empty(&self) -> bool {
        self.projection.is_empty()
    }

    pub fn highlighted(&self) -> Option<SelectionRange> {
        self.sync.highlighted()
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams::from_geometry(&self.geometry)
    }

    pub fn cell_styles(&self) -> CellStyleTable {
        CellStyleTable::build(&self.geometry)
    }

    pub fn on_projection<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ProjectionEvent) + 'static,
    {
        self.projector.subscribe(callback)
    }

    pub fn on_sync<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SyncEvent) + 'static,
    {
        self.sync.subscribe(callback)
    }

    // ============================================
    // Passes
    // ============================================

    fn relayout(&mut self) {
        let params = self.settings.layout_params(&self.geometry);
        self.layout = Layout::compute(&self.projection.nodes, params);
    }

    fn run_pass(&mut self) {
        self.projection = self.projector.run(&self.buffer, &self.geometry);
        self.relayout();
        let selection = self.editor.selection();
        self.sync.refresh(selection, &mut self.projection.nodes);
    }

    // ============================================
    // Interaction
    // ============================================

    /// The editor content changed: persist it and run a new pass.
    pub fn on_input(&mut self) {
        let text = self.editor.text();
        self.store.set(keys::PLAINTEXT, &text);
        self.buffer.set_text(&text);
        self.settings.plaintext = text;
        self.run_pass();
    }

    /// The editor selection changed: mirror it onto the glyphs.
    pub fn on_selection_changed(&mut self) -> Option<usize> {
        let selection = self.editor.selection();
        self.sync
            .on_selection_changed(selection, &mut self.projection.nodes)
    }

    /// A glyph node was activated: place the editor cursor on it.
    pub fn activate_glyph(&mut self, offset: usize) -> Option<SelectionRange> {
        self.sync
            .activate(offset, &mut self.editor, &mut self.projection.nodes)
    }

    /// A click landed at a pixel position of the glyph view.
    pub fn click_at(&mut self, x: f32, y: f32) -> Option<SelectionRange> {
        let Some(offset) = self.layout.hit_test(x, y) else {
            debug!(x, y, "click hit no glyph");
            return None;
        };
        self.activate_glyph(offset)
    }

    /// A new atlas image finished loading.
    ///
    /// Rejected images leave everything as it was.
    pub fn ingest_atlas(&mut self, image: &ImageResource) -> Result<()> {
        let geometry = calibrate_image(&self.geometry, image, GridShape::CANONICAL)?;

        self.settings.cell_width = geometry.cell_width();
        self.settings.cell_height = geometry.cell_height();
        self.settings.image.data_url = Some(image.data_url.clone());
        self.settings.image.width = image.width;
        self.settings.image.height = image.height;
        self.store
            .set(keys::CELL_WIDTH, &geometry.cell_width().to_string());
        self.store
            .set(keys::CELL_HEIGHT, &geometry.cell_height().to_string());
        self.settings.save_image(&mut self.store);

        self.geometry = geometry;
        self.run_pass();
        Ok(())
    }

    // ============================================
    // Options
    // ============================================

    /// Change the minimum line distance. Negative or non-finite values are rejected.
    pub fn set_line_height(&mut self, line_height: f32) -> Result<()> {
        let line_height = validate_line_height(line_height)?;
        self.settings.line_height = line_height;
        self.store.set(keys::LINE_HEIGHT, &line_height.to_string());
        self.relayout();
        Ok(())
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.settings.direction = direction;
        self.store.set(keys::DIRECTION, direction.as_str());
        self.relayout();
    }

    pub fn set_writing_mode(&mut self, writing_mode: WritingMode) {
        self.settings.writing_mode = writing_mode;
        self.store.set(keys::WRITING_MODE, writing_mode.as_str());
        self.relayout();
    }

    /// Change the rendering multiplier. Invalid scales are rejected.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        let geometry = self.geometry.with_scale(scale);
        geometry.validate()?;
        self.settings.scale = scale;
        self.store.set(keys::SCALE, &scale.to_string());
        self.geometry = geometry;
        self.run_pass();
        Ok(())
    }

    pub fn set_padding(&mut self, padding: u32) {
        self.geometry = self.geometry.with_padding(padding);
        self.settings.padding = padding;
        self.store.set(keys::PADDING, &padding.to_string());
        self.run_pass();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::settings::MemoryStore;
    use crate::text::MemoryEditor;

    fn session(text: &str) -> Session<MemoryEditor, MemoryStore> {
        let mut store = MemoryStore::new();
        store.set(keys::PLAINTEXT, text);
        Session::restore(MemoryEditor::new(), store)
    }

    #[test]
    fn test_restore_seeds_editor_and_projects() {
        let s = session("ab\nc");
        assert_eq!(s.editor().text(), "ab\nc");
        assert_eq!(s.nodes().len(), 4);
        assert_eq!(s.projection().pass, 1);
        assert_eq!(s.editor().change_count(), 0);
    }

    #[test]
    fn test_restore_empty_shows_placeholder() {
        let s = Session::restore(MemoryEditor::new(), MemoryStore::new());
        assert!(s.is_empty());
        assert_eq!(*s.geometry(), AtlasGeometry::default());
    }

    #[test]
    fn test_input_persists_and_reprojects() {
        let mut s = session("");
        s.editor_mut().type_text("hi");
        s.on_input();
        assert_eq!(s.nodes().len(), 2);
        assert_eq!(s.store().get(keys::PLAINTEXT).as_deref(), Some("hi"));
        assert_eq!(s.settings().plaintext, "hi");
        assert_eq!(s.projection().pass, 2);
    }

    #[test]
    fn test_scale_rejects_invalid() {
        let mut s = session("a");
        assert!(matches!(s.set_scale(0.0), Err(Error::InvalidGeometry(_))));
        assert_eq!(s.geometry().scale(), 4.0);
        assert!(s.store().get(keys::SCALE).is_none());
        assert!(s.set_scale(2.0).is_ok());
        assert_eq!(s.geometry().scale(), 2.0);
        assert_eq!(s.store().get(keys::SCALE).as_deref(), Some("2"));
    }

    #[test]
    fn test_flow_options_relayout_only() {
        let mut s = session("ab");
        s.set_direction(Direction::Rtl);
        assert_eq!(s.projection().pass, 1);
        assert_eq!(s.layout().placement(0).unwrap().column, 1);
        assert_eq!(s.store().get(keys::DIRECTION).as_deref(), Some("rtl"));
        s.set_writing_mode(WritingMode::VerticalLr);
        assert_eq!(s.layout().placement(1).unwrap().row, 0);
        assert!(s.set_line_height(100.0).is_ok());
        assert_eq!(s.settings().line_height, 100.0);
    }

    #[test]
    fn test_line_height_rejects_invalid() {
        let mut s = session("a\nb");
        let before = *s.layout().placement(2).unwrap();
        for bad in [f32::NAN, -5.0, f32::INFINITY] {
            assert!(matches!(
                s.set_line_height(bad),
                Err(Error::InvalidSetting { .. })
            ));
        }
        assert_eq!(s.settings().line_height, 1.0);
        assert!(s.store().get(keys::LINE_HEIGHT).is_none());
        assert_eq!(*s.layout().placement(2).unwrap(), before);
    }

    #[test]
    fn test_restore_keeps_valid_fields_next_to_invalid_ones() {
        let mut store = MemoryStore::new();
        store.set(keys::CELL_WIDTH, "0");
        store.set(keys::SCALE, "2");
        let s = Session::restore(MemoryEditor::new(), store);
        assert_eq!(s.geometry().cell_width(), s.settings().cell_width);
        assert_eq!(s.geometry().cell_width(), 10);
        assert_eq!(s.geometry().scale(), 2.0);
        assert_eq!(s.settings().scale, 2.0);
    }

    #[test]
    fn test_padding_changes_box_size() {
        let mut s = session("a");
        s.set_padding(0);
        assert_eq!(s.layout().params().box_width, 40.0);
        assert_eq!(s.store().get(keys::PADDING).as_deref(), Some("0"));
    }
}
