//! Image placement
//!
//! Loading is done by the host (a browser `Image`, a file read) and reported
//! back; this module only decides where a loaded image goes.

use kurbo::{Rect, Size};
use shared::{Drawable, ObjectId, Shape, Transform2D};
use tracing::{debug, info};

use super::{CanvasSize, SceneState};

/// Natural dimensions of a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageLoadError {
    #[error("unsupported image source: {0}")]
    Unsupported(String),

    #[error("failed to load image {url}: {reason}")]
    Failed { url: String, reason: String },

    #[error("image {0} has zero size")]
    Empty(String),
}

/// Resolves an image URL to its dimensions
pub trait ImageLoader {
    fn load(&self, url: &str, cross_origin: bool) -> Result<ImageInfo, ImageLoadError>;
}

/// Loads local files (plain paths or `file://` URLs)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageLoader;

#[cfg(not(target_arch = "wasm32"))]
impl ImageLoader for FileImageLoader {
    fn load(&self, url: &str, _cross_origin: bool) -> Result<ImageInfo, ImageLoadError> {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            return Err(ImageLoadError::Unsupported(url.to_string()));
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        let (width, height) =
            image::image_dimensions(path).map_err(|e| ImageLoadError::Failed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(ImageInfo { width, height })
    }
}

/// Uniform scale and top-left position that fit an image inside the canvas
/// minus `margin`, centered.
pub fn fit_to_canvas(canvas: CanvasSize, image: ImageInfo, margin: f64) -> (f64, f64, f64) {
    let available = Size::new(
        (canvas.width - margin).max(1.0),
        (canvas.height - margin).max(1.0),
    );
    let natural = Size::new(f64::from(image.width), f64::from(image.height));
    let scale = (available.width / natural.width).min(available.height / natural.height);

    let center = Rect::new(0.0, 0.0, canvas.width, canvas.height).center();
    let placed = Rect::from_center_size(center, natural * scale);
    (scale, placed.x0, placed.y0)
}

impl SceneState {
    /// Append a loaded image, scaled and centered
    pub fn place_image(
        &mut self,
        src: impl Into<String>,
        info: ImageInfo,
        cross_origin: bool,
        margin: f64,
    ) -> Result<Option<ObjectId>, ImageLoadError> {
        let src = src.into();
        let Some(canvas) = self.canvas_size() else {
            debug!("place_image ignored: canvas not initialized");
            return Ok(None);
        };
        if info.width == 0 || info.height == 0 {
            return Err(ImageLoadError::Empty(src));
        }

        let (scale, left, top) = fit_to_canvas(canvas, info, margin);
        let mut drawable = Drawable::new(
            Self::next_id(),
            Shape::Image {
                src,
                width: f64::from(info.width),
                height: f64::from(info.height),
                cross_origin,
            },
        );
        drawable.transform = Transform2D {
            scale_x: scale,
            scale_y: scale,
            ..Transform2D::at(left, top)
        };
        drawable.stroke_width = 0.0;

        let id = self.push_object(drawable);
        info!("Placed image {} at scale {:.3}", id, scale);
        Ok(Some(id))
    }
}
