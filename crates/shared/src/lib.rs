//! Scene model shared by the editor core and its bindings.
//!
//! A [`Scene`] is an ordered list of [`Drawable`]s plus a background color.
//! It is self-contained: its JSON form ([`Snapshot`]) reconstructs it exactly.

use serde::{Deserialize, Serialize};

mod color;
mod text;

pub use color::{Color, ParseColorError};
pub use text::{
    FontStyle, FontWeight, PropertyChange, TextAlign, TextDecoration, TextOptions, TextStyle,
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT,
};

/// Unique identifier of a drawable in the scene
pub type ObjectId = String;

/// Current scene format version
pub const SCENE_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCENE_VERSION
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_scale() -> f64 {
    1.0
}

fn default_opacity() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    1.0
}

/// 2D point in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Placement of a drawable. Origin is the drawable's top-left corner;
/// rotation is in degrees around that origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub left: f64,
    pub top: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    #[serde(default)]
    pub angle: f64,
}

impl Transform2D {
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

/// Shape kinds offered by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[serde(alias = "rectangle")]
    Rect,
    Circle,
    Triangle,
}

/// Type-specific content of a drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Triangle {
        width: f64,
        height: f64,
    },
    Text {
        text: String,
        style: TextStyle,
    },
    Image {
        src: String,
        width: f64,
        height: f64,
        #[serde(default)]
        cross_origin: bool,
    },
    /// Free-hand stroke; points are relative to the drawable origin
    Path {
        points: Vec<Point2D>,
    },
    Group {
        objects: Vec<Drawable>,
    },
}

impl Shape {
    /// Type tag as it appears in the serialized scene
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Circle { .. } => "circle",
            Shape::Triangle { .. } => "triangle",
            Shape::Text { .. } => "text",
            Shape::Image { .. } => "image",
            Shape::Path { .. } => "path",
            Shape::Group { .. } => "group",
        }
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match self {
            Shape::Text { style, .. } => Some(style),
            _ => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match self {
            Shape::Text { style, .. } => Some(style),
            _ => None,
        }
    }
}

/// One item on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: ObjectId,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(flatten)]
    pub transform: Transform2D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Drawable {
    /// Drawable at the origin with default appearance
    pub fn new(id: impl Into<ObjectId>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            shape,
            transform: Transform2D::default(),
            fill: None,
            stroke: None,
            stroke_width: default_stroke_width(),
            opacity: default_opacity(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.shape, Shape::Text { .. })
    }
}

/// Full state of the drawing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default)]
    pub objects: Vec<Drawable>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION,
            background: Color::WHITE,
            objects: Vec::new(),
        }
    }
}

impl Scene {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find a top-level drawable by ID
    pub fn get(&self, id: &str) -> Option<&Drawable> {
        self.objects.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Drawable> {
        self.objects.iter_mut().find(|d| d.id == id)
    }

    /// Remove a top-level drawable, returning it
    pub fn remove(&mut self, id: &str) -> Option<Drawable> {
        let pos = self.objects.iter().position(|d| d.id == id)?;
        Some(self.objects.remove(pos))
    }
}

/// Serialized scene used as a history entry. Compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    /// Serialize a scene into a snapshot
    pub fn capture(scene: &Scene) -> Result<Self, serde_json::Error> {
        serde_json::to_string(scene).map(Snapshot)
    }

    /// Rebuild the scene this snapshot was captured from
    pub fn restore(&self) -> Result<Scene, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Wrap already-serialized scene JSON without validating it
    pub fn from_json(json: impl Into<String>) -> Self {
        Snapshot(json.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
