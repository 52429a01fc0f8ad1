//! Free-hand drawing modes and stroke commits

use serde::{Deserialize, Serialize};
use shared::{Color, Drawable, ObjectId, Point2D, Shape, Transform2D};
use tracing::{debug, info};

use super::SceneState;

/// Pointer mode of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingMode {
    /// Objects are picked and transformed
    #[default]
    Select,
    Brush,
    Spray,
    /// Paints with the background color
    Eraser,
}

impl DrawingMode {
    pub fn is_drawing(&self) -> bool {
        !matches!(self, DrawingMode::Select)
    }
}

/// Stroke settings used by drawing modes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DrawingState {
    pub(crate) mode: DrawingMode,
    pub(crate) brush: Brush,
}

impl SceneState {
    pub fn drawing_mode(&self) -> DrawingMode {
        self.drawing.mode
    }

    /// Brush a stroke committed now would use. The eraser paints with the
    /// background of the live scene, whatever it was when the mode was set.
    pub fn brush(&self) -> Brush {
        match self.drawing.mode {
            DrawingMode::Eraser => Brush {
                color: self.scene().background,
                ..self.drawing.brush
            },
            _ => self.drawing.brush,
        }
    }

    /// Switch pointer mode. Drawing modes drop the selection.
    pub fn set_drawing_mode(&mut self, mode: DrawingMode, color: Color, width: f64) -> bool {
        if !self.is_initialized() {
            debug!("set_drawing_mode ignored: canvas not initialized");
            return false;
        }

        self.drawing.mode = mode;
        self.drawing.brush = Brush {
            color,
            width: width.max(0.0),
        };
        if mode.is_drawing() {
            self.selection.clear();
        }
        debug!("Drawing mode {:?} ({} @ {})", mode, color, width);
        true
    }

    /// Commit a free-hand stroke drawn in canvas coordinates as a path.
    /// Ignored in select mode and for strokes of fewer than two points.
    pub fn finish_stroke(&mut self, points: &[Point2D]) -> Option<ObjectId> {
        if !self.is_initialized() || !self.drawing.mode.is_drawing() || points.len() < 2 {
            return None;
        }

        let left = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let relative = points
            .iter()
            .map(|p| Point2D::new(p.x - left, p.y - top))
            .collect();

        let brush = self.brush();
        let mut drawable = Drawable::new(Self::next_id(), Shape::Path { points: relative });
        drawable.transform = Transform2D::at(left, top);
        drawable.stroke = Some(brush.color);
        drawable.stroke_width = brush.width;

        let id = self.push_object(drawable);
        info!("Committed {:?} stroke {} ({} points)", self.drawing.mode, id, points.len());
        Some(id)
    }
}
