//! Shape creation, deletion, and background changes

use shared::{Color, Drawable, ObjectId, Shape, ShapeKind, Transform2D};
use tracing::{debug, info};

use super::SceneState;

const DEFAULT_LEFT: f64 = 100.0;
const DEFAULT_TOP: f64 = 100.0;
const DEFAULT_SIZE: f64 = 100.0;
const DEFAULT_STROKE_WIDTH: f64 = 2.0;

impl SceneState {
    /// Append a rectangle, circle, or triangle with default geometry
    pub fn add_shape(&mut self, kind: ShapeKind, stroke: Color, fill: Color) -> Option<ObjectId> {
        if !self.is_initialized() {
            debug!("add_shape ignored: canvas not initialized");
            return None;
        }

        let shape = match kind {
            ShapeKind::Rect => Shape::Rect {
                width: DEFAULT_SIZE,
                height: DEFAULT_SIZE,
            },
            ShapeKind::Circle => Shape::Circle {
                radius: DEFAULT_SIZE / 2.0,
            },
            ShapeKind::Triangle => Shape::Triangle {
                width: DEFAULT_SIZE,
                height: DEFAULT_SIZE,
            },
        };

        let mut drawable = Drawable::new(Self::next_id(), shape);
        drawable.transform = Transform2D::at(DEFAULT_LEFT, DEFAULT_TOP);
        drawable.fill = Some(fill);
        drawable.stroke = Some(stroke);
        drawable.stroke_width = DEFAULT_STROKE_WIDTH;

        let id = self.push_object(drawable);
        info!("Added {:?} {}", kind, id);
        Some(id)
    }

    /// Remove the active object. Returns its ID.
    pub fn delete_active(&mut self) -> Option<ObjectId> {
        let id = self.selection.active()?.clone();
        let removed = self.scene_mut().remove(&id)?;
        self.selection.clear();
        self.touch();
        info!("Deleted {} {}", removed.shape.type_name(), id);
        Some(id)
    }

    /// Change the canvas background color
    pub fn set_background(&mut self, color: Color) -> bool {
        if !self.is_initialized() || self.scene().background == color {
            return false;
        }
        self.scene_mut().background = color;
        self.touch();
        debug!("Background set to {}", color);
        true
    }
}
