//! Integration tests for mirroring history to a key-value store.

use canvas_editor_lib::fixtures;
use canvas_editor_lib::harness::TestHarness;
use canvas_editor_lib::state::{
    EditorSettings, EditorState, FileStore, KeyValueStore, MemoryStore, StoreError,
    DESIGN_STATE_KEY, REDO_STACK_KEY, UNDO_STACK_KEY,
};
use shared::{Color, Snapshot};

#[test]
fn test_persisted_undo_stack_reloads_deep_equal() {
    let mut h = TestHarness::new();
    h.add_rect();
    h.add_circle();
    h.add_text("back print");

    let in_memory = h.editor.history().undo_stack().to_vec();
    assert_eq!(in_memory.len(), 4);

    let store = h.editor.into_store();
    let fresh = TestHarness::from_store(store);
    assert_eq!(fresh.editor.history().undo_stack(), in_memory.as_slice());
    assert_eq!(fresh.snapshot().as_ref(), in_memory.last());
}

#[test]
fn test_reset_removes_persisted_keys() {
    let mut h = TestHarness::new();
    h.add_rect();
    h.undo();
    assert!(h.store().contains(UNDO_STACK_KEY));
    assert!(h.store().contains(REDO_STACK_KEY));

    h.reset();
    assert!(!h.store().contains(UNDO_STACK_KEY));
    assert!(!h.store().contains(REDO_STACK_KEY));
}

#[test]
fn test_redo_stack_survives_reload() {
    let mut h = TestHarness::new();
    h.add_rect();
    h.add_circle();
    h.undo();

    h.reload();
    assert_eq!(h.redo_len(), 1);
    assert_eq!(h.object_count(), 1);
    assert!(h.redo());
    assert_eq!(h.object_count(), 2);
}

#[test]
fn test_corrupt_stack_falls_back_to_fresh_canvas() {
    let mut store = MemoryStore::new();
    store.set(UNDO_STACK_KEY, "{not json").unwrap();
    let h = TestHarness::from_store(store);
    assert_eq!(h.undo_len(), 1);
    assert_eq!(h.object_count(), 0);
}

#[test]
fn test_restore_can_be_disabled() {
    let mut h = TestHarness::new();
    h.add_rect();
    let store = h.editor.into_store();

    let mut settings = EditorSettings::default();
    settings.history.restore_on_init = false;
    let mut editor = EditorState::new(store, settings);
    editor.init(600.0, 600.0, Color::WHITE);
    assert!(editor.scene().scene().is_empty());
    assert_eq!(editor.history().undo_stack().len(), 1);
}

#[test]
fn test_persisted_stacks_track_every_step() {
    let mut h = TestHarness::new();
    h.add_rect();
    assert_eq!(h.persisted_undo().len(), 2);
    h.undo();
    assert_eq!(h.persisted_undo().len(), 1);
    assert_eq!(h.persisted_redo().len(), 1);
    h.redo();
    assert_eq!(h.persisted_undo(), h.editor.history().undo_stack());
    assert!(h.persisted_redo().is_empty());
}

/// Store that rejects every write, as a browser with storage disabled would
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::QuotaExceeded {
            key: key.to_string(),
        })
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}

#[test]
fn test_storage_failures_keep_history_in_memory() {
    let mut editor = EditorState::new(ReadOnlyStore, EditorSettings::default());
    editor.init(300.0, 300.0, Color::WHITE);
    editor.add_shape(shared::ShapeKind::Rect, Color::BLACK, Color::WHITE);
    editor.add_shape(shared::ShapeKind::Circle, Color::BLACK, Color::WHITE);

    assert_eq!(editor.history().undo_stack().len(), 3);
    assert!(editor.undo());
    assert_eq!(editor.scene().scene().len(), 1);
    assert!(editor.reset());
    assert!(editor.scene().scene().is_empty());
    assert!(editor.save_handoff().is_err());
}

#[test]
fn test_handoff_applied_once() {
    let mut store = MemoryStore::new();
    let design = fixtures::handoff(fixtures::sample_scene(), "hoodie");
    store
        .set(DESIGN_STATE_KEY, &serde_json::to_string(&design).unwrap())
        .unwrap();

    let mut h = TestHarness::from_store(store);
    assert_eq!(h.object_count(), 2);
    assert_eq!(h.editor.apparel(), Some("hoodie"));
    assert!(!h.store().contains(DESIGN_STATE_KEY));
    assert!(!h.undo());

    h.reload();
    assert_eq!(h.object_count(), 2);
    assert_eq!(h.undo_len(), 1);
}

#[test]
fn test_file_store_history_round_trip() {
    let dir = std::env::temp_dir().join(format!("canvas-editor-it-{}", uuid::Uuid::new_v4()));

    let mut editor = EditorState::new(FileStore::new(&dir), EditorSettings::default());
    editor.init(400.0, 400.0, Color::WHITE);
    editor.add_shape(shared::ShapeKind::Triangle, Color::BLACK, Color::WHITE);
    let top: Option<Snapshot> = editor.scene().snapshot();
    drop(editor);

    let mut reopened = EditorState::new(FileStore::new(&dir), EditorSettings::default());
    reopened.init(400.0, 400.0, Color::WHITE);
    assert_eq!(reopened.scene().snapshot(), top);
    assert_eq!(reopened.history().undo_stack().len(), 2);

    reopened.reset();
    assert!(!dir.join(format!("{UNDO_STACK_KEY}.json")).exists());

    let _ = std::fs::remove_dir_all(&dir);
}
