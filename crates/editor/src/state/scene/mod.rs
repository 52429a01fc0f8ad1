//! Scene store
//!
//! Owns the live scene and performs primitive mutations. Every mutating
//! operation returns whether the scene changed; all of them are no-ops until
//! the canvas has been initialized.

mod display;
mod drawing;
mod image_ops;
mod shape_ops;
mod text_ops;

pub use display::{drawable_display_name, short_id};
pub use drawing::{Brush, DrawingMode};
pub use image_ops::{fit_to_canvas, ImageInfo, ImageLoadError, ImageLoader};
#[cfg(not(target_arch = "wasm32"))]
pub use image_ops::FileImageLoader;

use shared::{Color, Drawable, ObjectId, Scene, Snapshot};
use tracing::{debug, info, warn};

use super::selection::SelectionState;

/// Dimensions of an initialized canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Live scene plus the non-serialized editing state around it
#[derive(Debug, Default)]
pub struct SceneState {
    scene: Scene,
    canvas: Option<CanvasSize>,
    /// Background of a freshly constructed canvas
    base_background: Color,
    pub(crate) selection: SelectionState,
    pub(crate) drawing: drawing::DrawingState,
    /// Monotonically increasing version counter, bumped on every change
    version: u64,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct the canvas surface with an empty scene
    pub fn initialize(&mut self, width: f64, height: f64, background: Color) {
        info!("Canvas initialized: {}x{}", width, height);
        self.canvas = Some(CanvasSize { width, height });
        self.base_background = background;
        self.scene = Scene {
            background,
            ..Scene::default()
        };
        self.selection.clear();
        self.drawing = drawing::DrawingState::default();
        self.version += 1;
    }

    pub fn is_initialized(&self) -> bool {
        self.canvas.is_some()
    }

    /// Canvas dimensions, once initialized
    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.canvas
    }

    /// The live scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Serialize the live scene; `None` before init
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.canvas?;
        match Snapshot::capture(&self.scene) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Failed to serialize scene: {e}");
                None
            }
        }
    }

    /// Replace the whole scene. `None` resets to a freshly constructed,
    /// empty canvas. A snapshot that does not parse leaves the scene as is.
    pub fn load_scene(&mut self, snapshot: Option<&Snapshot>) -> bool {
        if self.canvas.is_none() {
            debug!("load_scene ignored: canvas not initialized");
            return false;
        }

        let scene = match snapshot {
            Some(snapshot) => match snapshot.restore() {
                Ok(scene) => scene,
                Err(e) => {
                    warn!("Failed to load snapshot: {e}");
                    return false;
                }
            },
            None => Scene {
                background: self.base_background,
                ..Scene::default()
            },
        };

        self.set_scene(scene);
        true
    }

    /// Replace the whole scene with an already-built one
    pub(crate) fn set_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.selection.clear();
        self.version += 1;
    }

    /// Make an object the active one. Returns false if it does not exist.
    pub fn select(&mut self, id: &str) -> bool {
        if self.canvas.is_none() || self.scene.get(id).is_none() {
            return false;
        }
        self.selection.select(id.to_string());
        true
    }

    /// Deselect the active object; the scene is untouched
    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    pub fn active_id(&self) -> Option<&ObjectId> {
        self.selection.active()
    }

    pub fn active_object(&self) -> Option<&Drawable> {
        self.scene.get(self.selection.active()?)
    }

    pub(crate) fn active_object_mut(&mut self) -> Option<&mut Drawable> {
        let id = self.selection.active()?.clone();
        self.scene.get_mut(&id)
    }

    pub(crate) fn next_id() -> ObjectId {
        uuid::Uuid::new_v4().to_string()
    }

    /// Append a drawable and bump the version
    pub(crate) fn push_object(&mut self, drawable: Drawable) -> ObjectId {
        let id = drawable.id.clone();
        self.scene.objects.push(drawable);
        self.version += 1;
        id
    }

    pub(crate) fn touch(&mut self) {
        self.version += 1;
    }

    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ShapeKind;

    fn ready() -> SceneState {
        let mut s = SceneState::new();
        s.initialize(400.0, 300.0, Color::WHITE);
        s
    }

    #[test]
    fn test_uninitialized_is_inert() {
        let mut s = SceneState::new();
        assert!(s.snapshot().is_none());
        assert!(s.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE).is_none());
        assert!(!s.load_scene(None));
        assert!(!s.select("x"));
        assert!(s.scene().is_empty());
    }

    #[test]
    fn test_load_none_resets_to_empty() {
        let mut s = ready();
        s.add_shape(ShapeKind::Circle, Color::BLACK, Color::WHITE);
        assert_eq!(s.scene().len(), 1);
        assert!(s.load_scene(None));
        assert!(s.scene().is_empty());
        assert_eq!(s.scene().background, Color::WHITE);
    }

    #[test]
    fn test_load_snapshot_replaces_scene_and_clears_selection() {
        let mut s = ready();
        let before = s.snapshot().unwrap();
        let id = s.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE).unwrap();
        assert!(s.select(&id));

        assert!(s.load_scene(Some(&before)));
        assert!(s.scene().is_empty());
        assert!(s.active_id().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_leaves_scene() {
        let mut s = ready();
        s.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE);
        assert!(!s.load_scene(Some(&Snapshot::from_json("{bad"))));
        assert_eq!(s.scene().len(), 1);
    }

    #[test]
    fn test_select_unknown_fails() {
        let mut s = ready();
        assert!(!s.select("missing"));
        assert!(s.active_object().is_none());
    }

    #[test]
    fn test_version_bumps() {
        let mut s = ready();
        let v = s.version();
        s.add_shape(ShapeKind::Triangle, Color::BLACK, Color::WHITE);
        assert!(s.version() > v);
    }
}
