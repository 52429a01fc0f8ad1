//! Integration tests for TestHarness.
//!
//! Tests the headless harness API for programmatic canvas editing.

use canvas_editor_lib::fixtures;
use canvas_editor_lib::harness::TestHarness;
use shared::ShapeKind;

#[test]
fn test_harness_undo_redo_cycle() {
    let mut h = TestHarness::new();
    h.add_rect();
    h.add_circle();
    assert_eq!(h.object_count(), 2);

    assert!(h.undo());
    assert_eq!(h.object_count(), 1);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0);

    assert!(!h.undo()); // only the baseline left
    assert_eq!(h.object_count(), 0);

    assert!(h.redo());
    assert_eq!(h.object_count(), 1);

    assert!(h.redo());
    assert_eq!(h.object_count(), 2);

    assert!(!h.redo());
}

#[test]
fn test_harness_load_export_json() {
    let mut h1 = TestHarness::new();
    h1.add_shape(ShapeKind::Triangle);
    h1.add_text("caption");
    let json = h1.export_scene_json();

    let mut h2 = TestHarness::new();
    assert!(h2.load_scene_json(&json));
    assert_eq!(h2.object_count(), 2);
    assert_eq!(h2.scene(), h1.scene());
}

#[test]
fn test_harness_load_corrupt_json_keeps_scene() {
    let mut h = TestHarness::new();
    h.add_rect();
    assert!(!h.load_scene_json("[1, 2"));
    assert_eq!(h.object_count(), 1);
}

#[test]
fn test_harness_loads_fixture_scene() {
    let mut h = TestHarness::new();
    let json = serde_json::to_string(&fixtures::sample_scene()).unwrap();
    assert!(h.load_scene_json(&json));
    assert!(h.select("t1"));
    assert!(h.set_property("font_size", serde_json::json!(40)));
    assert_eq!(h.text_style("t1").unwrap().font_size, 40.0);
    assert_eq!(h.undo_len(), 2);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0);
}

#[test]
fn test_harness_reload_keeps_design() {
    let mut h = TestHarness::new();
    let id = h.add_text("keep me");
    h.select(&id);
    h.set_property("underline", serde_json::json!(true));

    h.reload();
    assert_eq!(h.object_count(), 1);
    assert!(h.text_style(&id).unwrap().underline);
    assert!(h.editor.scene().active_id().is_none());
}
