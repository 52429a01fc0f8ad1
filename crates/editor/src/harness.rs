//! Headless test harness for programmatic canvas editing.
//!
//! Wraps an [`EditorState`] over an in-memory store so tests can drive the
//! full history and persistence path without a browser.

use shared::{
    Color, ObjectId, PropertyChange, Scene, ShapeKind, Snapshot, TextOptions, TextStyle,
};

use crate::state::{EditorSettings, EditorState, MemoryStore, REDO_STACK_KEY, UNDO_STACK_KEY};

/// Default harness canvas edge length
pub const HARNESS_CANVAS: f64 = 600.0;

/// Headless test harness around one editor
pub struct TestHarness {
    pub editor: EditorState<MemoryStore>,
}

impl TestHarness {
    /// Create a harness with an initialized, empty canvas.
    pub fn new() -> Self {
        let mut h = Self::uninitialized();
        h.init();
        h
    }

    /// Create a harness whose canvas has not been mounted yet
    pub fn uninitialized() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            editor: EditorState::new(MemoryStore::new(), settings),
        }
    }

    /// Mount an editor over an existing store, as a page load would
    pub fn from_store(store: MemoryStore) -> Self {
        let mut h = Self {
            editor: EditorState::new(store, EditorSettings::default()),
        };
        h.init();
        h
    }

    pub fn init(&mut self) {
        self.editor
            .init(HARNESS_CANVAS, HARNESS_CANVAS, Color::WHITE);
    }

    /// Drop the editor and mount a fresh one over the same store
    pub fn reload(&mut self) {
        let settings = self.editor.settings().clone();
        let old = std::mem::replace(
            &mut self.editor,
            EditorState::new(MemoryStore::new(), settings.clone()),
        );
        self.editor = EditorState::new(old.into_store(), settings);
        self.init();
    }

    // ── Scene manipulation ────────────────────────────────────

    pub fn add_shape(&mut self, kind: ShapeKind) -> ObjectId {
        self.editor
            .add_shape(kind, Color::BLACK, Color::WHITE)
            .unwrap_or_default()
    }

    /// Add a rectangle and return its ID
    pub fn add_rect(&mut self) -> ObjectId {
        self.add_shape(ShapeKind::Rect)
    }

    pub fn add_circle(&mut self) -> ObjectId {
        self.add_shape(ShapeKind::Circle)
    }

    /// Add black text with default styling and return its ID
    pub fn add_text(&mut self, text: &str) -> ObjectId {
        self.editor
            .add_text(text, Color::BLACK, &TextOptions::default())
            .unwrap_or_default()
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.editor.select(id)
    }

    /// Parse `prop`/`value` the way the command layer does and apply it
    pub fn set_property(&mut self, prop: &str, value: serde_json::Value) -> bool {
        match PropertyChange::from_prop(prop, value) {
            Ok(change) => self.editor.set_property(&change),
            Err(_) => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn reset(&mut self) -> bool {
        self.editor.reset()
    }

    /// Load a scene JSON as the live scene without recording it
    pub fn load_scene_json(&mut self, json: &str) -> bool {
        self.editor.replay_load(Some(&Snapshot::from_json(json)))
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(self.scene()).unwrap_or_default()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        self.editor.scene().scene()
    }

    pub fn object_count(&self) -> usize {
        self.scene().len()
    }

    /// Snapshot of the live scene
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.editor.scene().snapshot()
    }

    pub fn undo_len(&self) -> usize {
        self.editor.history().undo_stack().len()
    }

    pub fn redo_len(&self) -> usize {
        self.editor.history().redo_stack().len()
    }

    pub fn text_style(&self, id: &str) -> Option<&TextStyle> {
        self.scene().get(id)?.shape.text_style()
    }

    pub fn store(&self) -> &MemoryStore {
        self.editor.bridge().store()
    }

    /// Undo stack as currently persisted
    pub fn persisted_undo(&self) -> Vec<Snapshot> {
        self.editor.bridge().load_stack(UNDO_STACK_KEY)
    }

    /// Redo stack as currently persisted
    pub fn persisted_redo(&self) -> Vec<Snapshot> {
        self.editor.bridge().load_stack(REDO_STACK_KEY)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
