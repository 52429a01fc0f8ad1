//! Recorded scene edits and exports
//!
//! Thin wrappers over the scene store: each mutation that changed the scene
//! is committed to history. Selection and drawing-mode changes are not
//! scene content and are never recorded.

use shared::{Color, ObjectId, Point2D, PropertyChange, ShapeKind, TextOptions};
use tracing::{debug, info};

use super::persistence::KeyValueStore;
use super::scene::DrawingMode;
use super::EditorState;
use crate::export::{self, Download, ExportError};

impl<S: KeyValueStore> EditorState<S> {
    /// Add a default-sized shape and record it
    pub fn add_shape(&mut self, kind: ShapeKind, stroke: Color, fill: Color) -> Option<ObjectId> {
        let id = self.scene.add_shape(kind, stroke, fill)?;
        self.commit();
        Some(id)
    }

    /// Add a text block and record it
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        color: Color,
        options: &TextOptions,
    ) -> Option<ObjectId> {
        let id = self.scene.add_text(text, color, options)?;
        self.commit();
        Some(id)
    }

    /// Edit the selected object. A value equal to the current one records
    /// nothing.
    pub fn set_property(&mut self, change: &PropertyChange) -> bool {
        if !self.scene.set_active_property(change) {
            return false;
        }
        self.commit()
    }

    /// Change the background color and record it
    pub fn set_background(&mut self, color: Color) -> bool {
        if !self.scene.set_background(color) {
            return false;
        }
        self.commit()
    }

    /// Remove the selected object and record the removal
    pub fn delete_selection(&mut self) -> Option<ObjectId> {
        let id = self.scene.delete_active()?;
        self.commit();
        Some(id)
    }

    /// Commit a free-hand stroke in the current drawing mode and record it
    pub fn finish_stroke(&mut self, points: &[Point2D]) -> Option<ObjectId> {
        let id = self.scene.finish_stroke(points)?;
        self.commit();
        Some(id)
    }

    /// Make `id` the active object. Not recorded.
    pub fn select(&mut self, id: &str) -> bool {
        self.scene.select(id)
    }

    /// Deselect. Not recorded.
    pub fn clear_selection(&mut self) -> bool {
        self.scene.clear_selection()
    }

    /// Switch pointer mode and brush. Not recorded.
    pub fn set_drawing_mode(&mut self, mode: DrawingMode, color: Color, width: f64) -> bool {
        self.scene.set_drawing_mode(mode, color, width)
    }

    // ── Exports ──────────────────────────────────────────

    /// Queue a PNG of the scene. Returns false before init.
    pub fn export_raster(&mut self, multiplier: f64) -> Result<bool, ExportError> {
        let Some(canvas) = self.scene.canvas_size() else {
            debug!("export_raster ignored: canvas not initialized");
            return Ok(false);
        };
        let download = export::raster_download(
            self.scene.scene(),
            canvas.width,
            canvas.height,
            multiplier,
            self.font.as_ref(),
        )?;
        self.queue_download(download);
        Ok(true)
    }

    /// Use `bytes` (TrueType/OpenType) for text in raster exports
    pub fn set_export_font(&mut self, bytes: Vec<u8>) -> Result<(), ExportError> {
        self.font = Some(export::load_font(bytes)?);
        info!("Loaded export font");
        Ok(())
    }

    /// Queue an SVG of the scene. Returns false before init.
    pub fn export_svg(&mut self) -> bool {
        let Some(canvas) = self.scene.canvas_size() else {
            debug!("export_svg ignored: canvas not initialized");
            return false;
        };
        let download = export::svg_download(self.scene.scene(), canvas.width, canvas.height);
        self.queue_download(download);
        true
    }

    /// Queue the scene JSON. Returns false before init.
    pub fn export_json(&mut self) -> Result<bool, ExportError> {
        if !self.scene.is_initialized() {
            debug!("export_json ignored: canvas not initialized");
            return Ok(false);
        }
        let download = export::json_download(self.scene.scene())?;
        self.queue_download(download);
        Ok(true)
    }

    fn queue_download(&mut self, download: Download) {
        debug!(
            "Queued download {} ({} bytes)",
            download.file_name,
            download.bytes.len()
        );
        self.downloads.push(download);
    }

    /// Downloads queued and not yet drained
    pub fn pending_downloads(&self) -> &[Download] {
        &self.downloads
    }

    /// Drain the download outbox
    pub fn take_downloads(&mut self) -> Vec<Download> {
        std::mem::take(&mut self.downloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EditorSettings, MemoryStore};

    fn editor() -> EditorState<MemoryStore> {
        let mut e = EditorState::new(MemoryStore::new(), EditorSettings::default());
        e.init(200.0, 100.0, Color::WHITE);
        e
    }

    #[test]
    fn test_each_mutation_records_one_step() {
        let mut e = editor();
        let id = e.add_shape(ShapeKind::Circle, Color::BLACK, Color::WHITE).unwrap();
        e.add_text("hi", Color::BLACK, &TextOptions::default());
        e.set_background(Color::rgb(10, 20, 30));
        e.select(&id);
        e.delete_selection();
        assert_eq!(e.history().undo_stack().len(), 5);
        assert!(e.history().redo_stack().is_empty());
    }

    #[test]
    fn test_selection_is_not_recorded() {
        let mut e = editor();
        let id = e.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE).unwrap();
        e.select(&id);
        e.clear_selection();
        e.set_drawing_mode(DrawingMode::Brush, Color::BLACK, 3.0);
        assert_eq!(e.history().undo_stack().len(), 2);
    }

    #[test]
    fn test_unchanged_property_records_nothing() {
        let mut e = editor();
        let id = e.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE).unwrap();
        e.select(&id);
        assert!(!e.set_property(&PropertyChange::Fill(Color::WHITE)));
        assert!(e.set_property(&PropertyChange::Fill(Color::BLACK)));
        assert_eq!(e.history().undo_stack().len(), 3);
    }

    #[test]
    fn test_stroke_recorded() {
        let mut e = editor();
        e.set_drawing_mode(DrawingMode::Brush, Color::BLACK, 3.0);
        e.finish_stroke(&[Point2D::new(0.0, 0.0), Point2D::new(5.0, 5.0)])
            .unwrap();
        assert_eq!(e.history().undo_stack().len(), 2);
    }

    #[test]
    fn test_exports_queue_downloads_without_recording() {
        let mut e = editor();
        e.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE);
        assert!(e.export_raster(2.0).unwrap());
        assert!(e.export_svg());
        assert!(e.export_json().unwrap());
        assert_eq!(e.history().undo_stack().len(), 2);

        let downloads = e.take_downloads();
        let names: Vec<_> = downloads.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, ["canvas.png", "canvas.svg", "canvas.json"]);
        assert!(e.pending_downloads().is_empty());
    }

    #[test]
    fn test_invalid_export_font_rejected() {
        let mut e = editor();
        assert!(matches!(
            e.set_export_font(vec![0, 1, 2, 3]),
            Err(ExportError::InvalidFont(_))
        ));
        assert!(e.export_raster(1.0).unwrap());
    }

    #[test]
    fn test_eraser_follows_background_through_undo() {
        let mut e = editor();
        e.set_background(Color::rgb(255, 0, 0));
        e.set_drawing_mode(DrawingMode::Eraser, Color::BLACK, 6.0);
        assert!(e.undo());

        let id = e
            .finish_stroke(&[Point2D::new(0.0, 0.0), Point2D::new(9.0, 9.0)])
            .unwrap();
        let stroke = e.scene().scene().get(&id).unwrap().stroke;
        assert_eq!(stroke, Some(Color::WHITE));
    }

    #[test]
    fn test_export_before_init_is_noop() {
        let mut e = EditorState::new(MemoryStore::new(), EditorSettings::default());
        assert!(!e.export_raster(1.0).unwrap());
        assert!(!e.export_svg());
        assert!(e.take_downloads().is_empty());
    }

    #[test]
    fn test_mutations_before_init_are_noops() {
        let mut e = EditorState::new(MemoryStore::new(), EditorSettings::default());
        assert!(e.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE).is_none());
        assert!(e.add_text("x", Color::BLACK, &TextOptions::default()).is_none());
        assert!(!e.set_background(Color::BLACK));
        assert!(e.history().undo_stack().is_empty());
    }
}
