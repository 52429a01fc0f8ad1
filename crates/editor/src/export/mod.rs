//! Canvas exports: PNG raster, SVG document, and scene JSON.
//!
//! Every export produces a [`Download`] that the host saves as a file.

mod raster;
mod svg;

use kurbo::{Affine, Rect};
use serde::Serialize;
use shared::{Drawable, Scene, TextStyle};

pub use raster::{encode_png, load_font, raster_download, render_raster, RASTER_FILE_NAME};
pub use svg::{render_svg, svg_download, SVG_FILE_NAME};

/// File name of the scene JSON download
pub const JSON_FILE_NAME: &str = "canvas.json";

/// Largest accepted raster multiplier
pub const MAX_MULTIPLIER: f64 = 8.0;

/// Average glyph advance relative to the font size
const GLYPH_ADVANCE: f64 = 0.6;

/// A file produced by an export, waiting for the host to save it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Download {
    pub file_name: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Download {
    /// Download named `file_name` with the given MIME type
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid raster multiplier {0}")]
    InvalidMultiplier(f64),

    #[error("raster surface {width}x{height} out of range")]
    SurfaceSize { width: u32, height: u32 },

    #[error("invalid font: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to serialize scene: {0}")]
    Json(#[from] serde_json::Error),
}

/// Object space to canvas space
pub fn drawable_affine(drawable: &Drawable) -> Affine {
    let t = &drawable.transform;
    Affine::translate((t.left, t.top))
        * Affine::rotate(t.angle.to_radians())
        * Affine::scale_non_uniform(t.scale_x, t.scale_y)
}

/// Approximate layout box of a text block
pub fn text_box(text: &str, style: &TextStyle) -> Rect {
    let advance = style.font_size * (GLYPH_ADVANCE + style.char_spacing / 1000.0);
    let columns = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let rows = text.lines().count().max(1);
    Rect::new(
        0.0,
        0.0,
        columns as f64 * advance,
        rows as f64 * style.font_size * style.line_height,
    )
}

/// The scene as a pretty-printed `canvas.json` download
pub fn json_download(scene: &Scene) -> Result<Download, ExportError> {
    let bytes = serde_json::to_vec_pretty(scene)?;
    Ok(Download::new(JSON_FILE_NAME, "application/json", bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Color, Shape};

    #[test]
    fn test_json_download_round_trips() {
        let mut scene = Scene::default();
        let mut rect = Drawable::new(
            "r",
            Shape::Rect {
                width: 10.0,
                height: 10.0,
            },
        );
        rect.fill = Some(Color::BLACK);
        scene.objects.push(rect);

        let download = json_download(&scene).unwrap();
        assert_eq!(download.file_name, JSON_FILE_NAME);
        let back: Scene = serde_json::from_slice(&download.bytes).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_text_box_grows_with_lines() {
        let style = TextStyle::default();
        let one = text_box("abc", &style);
        let two = text_box("abc\nde", &style);
        assert_eq!(one.width(), two.width());
        assert!(two.height() > one.height());
    }
}
