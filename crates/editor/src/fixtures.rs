//! Factory functions for creating test data.
//!
//! Helpers to construct drawables, scenes, snapshots, and handoffs used in
//! tests and command scripts.

use shared::*;

use crate::state::DesignHandoff;

// ── Drawable factories ──────────────────────────────────────────

/// A filled rectangle at a position.
pub fn rect_at(id: &str, left: f64, top: f64, width: f64, height: f64) -> Drawable {
    let mut d = Drawable::new(id, Shape::Rect { width, height });
    d.transform = Transform2D::at(left, top);
    d.fill = Some(Color::WHITE);
    d.stroke = Some(Color::BLACK);
    d
}

/// A 100x100 rectangle at the origin.
pub fn unit_rect(id: &str) -> Drawable {
    rect_at(id, 0.0, 0.0, 100.0, 100.0)
}

pub fn circle_at(id: &str, left: f64, top: f64, radius: f64) -> Drawable {
    let mut d = Drawable::new(id, Shape::Circle { radius });
    d.transform = Transform2D::at(left, top);
    d.fill = Some(Color::WHITE);
    d.stroke = Some(Color::BLACK);
    d
}

/// A text drawable with default styling.
pub fn text(id: &str, content: &str) -> Drawable {
    let mut d = Drawable::new(
        id,
        Shape::Text {
            text: content.to_string(),
            style: TextStyle::default(),
        },
    );
    d.fill = Some(Color::BLACK);
    d
}

/// An image drawable with its natural size.
pub fn image(id: &str, src: &str, width: f64, height: f64) -> Drawable {
    Drawable::new(
        id,
        Shape::Image {
            src: src.to_string(),
            width,
            height,
            cross_origin: true,
        },
    )
}

// ── Scene factories ─────────────────────────────────────────────

/// Create an empty white scene.
pub fn empty_scene() -> Scene {
    Scene::default()
}

/// Create a scene from a list of drawables.
pub fn scene_with(objects: Vec<Drawable>) -> Scene {
    Scene {
        objects,
        ..Scene::default()
    }
}

/// A scene with one rectangle and one caption.
pub fn sample_scene() -> Scene {
    scene_with(vec![rect_at("r1", 10.0, 10.0, 50.0, 40.0), text("t1", "Hello")])
}

/// Snapshot of a scene; panics only on unserializable input, which the model
/// never produces.
pub fn snapshot_of(scene: &Scene) -> Snapshot {
    Snapshot::capture(scene).unwrap_or_else(|e| panic!("scene failed to serialize: {e}"))
}

/// Snapshots of scenes holding 0..n unit rectangles.
pub fn growing_stack(n: usize) -> Vec<Snapshot> {
    (0..n)
        .map(|count| {
            let objects = (0..count).map(|i| unit_rect(&format!("r{i}"))).collect();
            snapshot_of(&scene_with(objects))
        })
        .collect()
}

/// A handoff carrying `scene` and an apparel choice.
pub fn handoff(scene: Scene, apparel: &str) -> DesignHandoff {
    let mut h = DesignHandoff::new(scene);
    h.apparel = Some(apparel.to_string());
    h
}
