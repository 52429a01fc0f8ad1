//! Display helper functions for drawables

use shared::{Drawable, Shape};

/// Get display name for a drawable
pub fn drawable_display_name(drawable: &Drawable) -> String {
    let label = match &drawable.shape {
        Shape::Rect { .. } => "Rectangle".to_string(),
        Shape::Circle { .. } => "Circle".to_string(),
        Shape::Triangle { .. } => "Triangle".to_string(),
        Shape::Text { text, .. } => {
            let preview: String = text.chars().take(16).collect();
            if preview.len() < text.len() {
                format!("Text \"{}…\"", preview)
            } else {
                format!("Text \"{}\"", preview)
            }
        }
        Shape::Image { src, .. } => {
            let name = src.rsplit('/').next().unwrap_or(src);
            format!("Image {}", name)
        }
        Shape::Path { points } => format!("Stroke ({} pts)", points.len()),
        Shape::Group { objects } => format!("Group ({})", objects.len()),
    };
    format!("{} ({})", label, short_id(&drawable.id))
}

/// Get short ID for display
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
