//! Integration tests for the EditorCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use canvas_editor_lib::command::{execute_json, execute_json_batch};
use canvas_editor_lib::harness::TestHarness;
use canvas_editor_lib::state::{KeyValueStore, DESIGN_STATE_KEY, UNDO_STACK_KEY};

#[test]
fn test_command_init_uses_settings_defaults() {
    let mut h = TestHarness::uninitialized();
    let resp = execute_json(&mut h.editor, r#"{"command": "init"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["objects"], 0);
    assert_eq!(data["undo"], 1);

    let size = h.editor.scene().canvas_size().unwrap();
    assert_eq!(size.width, 600.0);
}

#[test]
fn test_commands_before_init_are_noops() {
    let mut h = TestHarness::uninitialized();
    let script = r#"[
        {"command": "add_shape", "shape": "rect"},
        {"command": "undo"},
        {"command": "reset"},
        {"command": "export_raster"}
    ]"#;
    let responses = execute_json_batch(&mut h.editor, script).unwrap();
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[0].data.as_ref().unwrap()["id"], serde_json::Value::Null);
    assert_eq!(responses[1].data.as_ref().unwrap()["undone"], false);
    assert_eq!(h.object_count(), 0);
    assert!(h.editor.take_downloads().is_empty());
}

#[test]
fn test_command_text_styling_flow() {
    let mut h = TestHarness::new();
    let resp = execute_json(
        &mut h.editor,
        r##"{"command": "add_text", "text": "Team", "color": "#000080",
             "options": {"font_family": "Georgia", "text_decoration": "underline"}}"##,
    )
    .unwrap();
    let id = resp.data.unwrap()["id"].as_str().unwrap().to_string();

    let select = format!(r#"{{"command": "select", "id": "{id}"}}"#);
    assert!(execute_json(&mut h.editor, &select).unwrap().success);

    let script = r##"[
        {"command": "set_property", "prop": "font_weight", "value": 700},
        {"command": "set_property", "prop": "text_align", "value": "center"},
        {"command": "set_property", "prop": "text_background_color", "value": "#ffff00"}
    ]"##;
    let responses = execute_json_batch(&mut h.editor, script).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let style = h.text_style(&id).unwrap();
    assert_eq!(style.font_family, "Georgia");
    assert!(style.underline);
    assert!(style.font_weight.is_bold());
    assert!(style.text_background_color.is_some());
    assert_eq!(h.undo_len(), 5);
}

#[test]
fn test_command_drawing_flow() {
    let mut h = TestHarness::new();
    let script = r##"[
        {"command": "set_drawing_mode", "mode": "brush", "color": "#ff0000", "width": 4},
        {"command": "finish_stroke", "points": [{"x": 10, "y": 10}, {"x": 60, "y": 40}]},
        {"command": "set_drawing_mode", "mode": "eraser", "width": 20},
        {"command": "finish_stroke", "points": [{"x": 20, "y": 20}, {"x": 30, "y": 30}]},
        {"command": "set_drawing_mode", "mode": "select"},
        {"command": "finish_stroke", "points": [{"x": 0, "y": 0}, {"x": 5, "y": 5}]}
    ]"##;
    execute_json_batch(&mut h.editor, script).unwrap();
    assert_eq!(h.object_count(), 2);

    let eraser = &h.scene().objects[1];
    assert_eq!(eraser.stroke, Some(h.scene().background));
    assert_eq!(eraser.stroke_width, 20.0);
}

#[test]
fn test_command_delete_selection() {
    let mut h = TestHarness::new();
    let id = h.add_rect();
    h.add_circle();

    let select = format!(r#"{{"command": "select", "id": "{id}"}}"#);
    execute_json(&mut h.editor, &select).unwrap();
    let resp = execute_json(&mut h.editor, r#"{"command": "delete_selection"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["removed"], id.as_str());
    assert_eq!(h.object_count(), 1);

    let resp = execute_json(&mut h.editor, r#"{"command": "delete_selection"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["removed"], serde_json::Value::Null);
}

#[test]
fn test_command_image_failure() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h.editor, r#"{"command": "add_image", "url": "gone.png"}"#)
        .unwrap();
    let ticket = resp.data.unwrap()["ticket"].as_u64().unwrap();

    let fail = format!(r#"{{"command": "fail_image", "ticket": {ticket}, "reason": "404"}}"#);
    let resp = execute_json(&mut h.editor, &fail).unwrap();
    assert_eq!(resp.data.unwrap()["dropped"], true);
    assert_eq!(h.object_count(), 0);
    assert_eq!(h.undo_len(), 1);

    let complete =
        format!(r#"{{"command": "complete_image", "ticket": {ticket}, "width": 10, "height": 10}}"#);
    let resp = execute_json(&mut h.editor, &complete).unwrap();
    assert_eq!(resp.data.unwrap()["id"], serde_json::Value::Null);
}

#[test]
fn test_command_exports() {
    let mut h = TestHarness::new();
    h.add_rect();
    let script = r#"[
        {"command": "export_raster", "multiplier": 2},
        {"command": "export_svg"},
        {"command": "export_json"}
    ]"#;
    let responses = execute_json_batch(&mut h.editor, script).unwrap();
    assert_eq!(responses[0].data.as_ref().unwrap()["download"]["mime"], "image/png");
    assert_eq!(responses[1].data.as_ref().unwrap()["download"]["mime"], "image/svg+xml");

    let downloads = h.editor.take_downloads();
    assert_eq!(downloads.len(), 3);
    let png = image::load_from_memory(&downloads[0].bytes).unwrap();
    assert_eq!((png.width(), png.height()), (1200, 1200));
    assert_eq!(h.undo_len(), 2);
}

#[test]
fn test_command_save_and_restore_handoff() {
    let mut h = TestHarness::new();
    h.add_rect();
    h.editor.set_apparel(Some("tote".into()));
    let resp = execute_json(&mut h.editor, r#"{"command": "save_handoff"}"#).unwrap();
    assert!(resp.success);
    assert!(h.store().contains(DESIGN_STATE_KEY));

    let design = h.store().get(DESIGN_STATE_KEY).unwrap().unwrap();
    let restore = format!(r#"{{"command": "restore_design", "design": {design}}}"#);
    let mut other = TestHarness::new();
    other.add_circle();
    other.add_circle();
    let resp = execute_json(&mut other.editor, &restore).unwrap();
    assert_eq!(resp.data.unwrap()["restored"], true);
    assert_eq!(other.object_count(), 1);
    assert_eq!(other.undo_len(), 1);
    assert_eq!(other.editor.apparel(), Some("tote"));
}

#[test]
fn test_command_reset_clears_store() {
    let mut h = TestHarness::new();
    let script = r##"[
        {"command": "add_shape", "shape": "circle", "fill": "#00ff00"},
        {"command": "set_background", "color": "#222222"},
        {"command": "undo"},
        {"command": "reset"},
        {"command": "inspect"}
    ]"##;
    let responses = execute_json_batch(&mut h.editor, script).unwrap();
    let data = responses[4].data.as_ref().unwrap();
    assert_eq!(data["object_count"], 0);
    assert_eq!(data["undo"], 1);
    assert_eq!(data["redo"], 0);
    assert_eq!(data["background"], "#ffffff");
    assert!(!h.store().contains(UNDO_STACK_KEY));
}

#[test]
fn test_command_unknown_is_rejected() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h.editor, r#"{"command": "explode"}"#).is_err());
    assert!(execute_json(&mut h.editor, r#"{"command": "add_shape", "shape": "hexagon"}"#).is_err());
}

#[test]
fn test_command_raster_shows_shapes_and_text() {
    let mut h = TestHarness::uninitialized();
    let script = r##"[
        {"command": "init", "width": 300, "height": 300},
        {"command": "add_shape", "shape": "rect", "fill": "#ff0000"},
        {"command": "add_text", "text": "HELLO", "color": "#000000", "options": {"font_size": 60}},
        {"command": "export_raster"}
    ]"##;
    let responses = execute_json_batch(&mut h.editor, script).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let downloads = h.editor.take_downloads();
    let png = image::load_from_memory(&downloads[0].bytes).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (300, 300));
    // Rectangle interior
    assert_eq!(png.get_pixel(150, 150).0, [255, 0, 0, 255]);
    // Inside the first glyph of the caption
    assert_eq!(png.get_pixel(66, 80).0, [0, 0, 0, 255]);
    // Untouched canvas
    assert_eq!(png.get_pixel(280, 20).0, [255, 255, 255, 255]);
}

#[test]
fn test_command_eraser_follows_background() {
    let mut h = TestHarness::new();
    let script = r##"[
        {"command": "set_drawing_mode", "mode": "eraser", "width": 12},
        {"command": "set_background", "color": "#00ff00"},
        {"command": "finish_stroke", "points": [{"x": 5, "y": 5}, {"x": 80, "y": 40}]}
    ]"##;
    let responses = execute_json_batch(&mut h.editor, script).unwrap();
    let id = responses[2].data.as_ref().unwrap()["id"].as_str().unwrap().to_string();

    let stroke = h.scene().get(&id).unwrap().stroke.unwrap();
    assert_eq!(stroke.to_string(), "#00ff00");
    assert_eq!(h.scene().background, stroke);
}
