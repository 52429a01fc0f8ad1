//! Text creation and property edits on the active object

use shared::{Color, Drawable, ObjectId, PropertyChange, Shape, TextOptions, TextStyle, Transform2D};
use tracing::{debug, info};

use super::SceneState;

const TEXT_LEFT: f64 = 50.0;
const TEXT_TOP: f64 = 50.0;

/// Assign `value` to `slot`, reporting whether anything changed
fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl SceneState {
    /// Append a text drawable filled with `color`, styled by `options`
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        color: Color,
        options: &TextOptions,
    ) -> Option<ObjectId> {
        if !self.is_initialized() {
            debug!("add_text ignored: canvas not initialized");
            return None;
        }

        let mut style = TextStyle::default();
        options.apply_to_style(&mut style);

        let mut drawable = Drawable::new(
            Self::next_id(),
            Shape::Text {
                text: text.into(),
                style,
            },
        );
        drawable.transform = Transform2D::at(TEXT_LEFT, TEXT_TOP);
        drawable.fill = Some(options.fill.unwrap_or(color));
        drawable.stroke = options.border_color;
        if let Some(opacity) = options.opacity {
            drawable.opacity = opacity.clamp(0.0, 1.0);
        }

        let id = self.push_object(drawable);
        info!("Added text {}", id);
        Some(id)
    }

    /// Apply one property edit to the active object. No-op without a
    /// selection, and for text properties on non-text objects.
    pub fn set_active_property(&mut self, change: &PropertyChange) -> bool {
        let Some(target) = self.active_object_mut() else {
            debug!("set {} ignored: nothing selected", change.name());
            return false;
        };

        let changed = match change {
            PropertyChange::Fill(color) => assign(&mut target.fill, Some(*color)),
            PropertyChange::Stroke(color) => assign(&mut target.stroke, Some(*color)),
            _ => {
                let type_name = target.shape.type_name();
                let Some(style) = target.shape.text_style_mut() else {
                    debug!("set {} ignored: active object is a {}", change.name(), type_name);
                    return false;
                };
                apply_text_change(style, change)
            }
        };

        if changed {
            self.touch();
            debug!("Set {} on active object", change.name());
        }
        changed
    }
}

fn apply_text_change(style: &mut TextStyle, change: &PropertyChange) -> bool {
    match change {
        PropertyChange::FontSize(v) => assign(&mut style.font_size, *v),
        PropertyChange::FontFamily(v) => assign(&mut style.font_family, v.clone()),
        PropertyChange::FontWeight(v) => assign(&mut style.font_weight, *v),
        PropertyChange::FontStyle(v) => assign(&mut style.font_style, *v),
        PropertyChange::Underline(v) => assign(&mut style.underline, *v),
        PropertyChange::Linethrough(v) => assign(&mut style.linethrough, *v),
        PropertyChange::Overline(v) => assign(&mut style.overline, *v),
        PropertyChange::CharSpacing(v) => assign(&mut style.char_spacing, *v),
        PropertyChange::TextBackgroundColor(v) => assign(&mut style.text_background_color, *v),
        PropertyChange::LineHeight(v) => assign(&mut style.line_height, *v),
        PropertyChange::TextAlign(v) => assign(&mut style.text_align, *v),
        PropertyChange::Fill(_) | PropertyChange::Stroke(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FontStyle, ShapeKind, TextAlign, TextDecoration, DEFAULT_FONT_SIZE};

    fn ready() -> SceneState {
        let mut s = SceneState::new();
        s.initialize(400.0, 400.0, Color::WHITE);
        s
    }

    #[test]
    fn test_add_text_applies_options() {
        let mut s = ready();
        let opts = TextOptions {
            font_style: Some(FontStyle::Italic),
            text_align: Some(TextAlign::Right),
            text_decoration: Some(TextDecoration::Underline),
            border_color: Some(Color::rgb(0, 0, 255)),
            opacity: Some(2.0),
            ..Default::default()
        };
        let id = s.add_text("Hi", Color::rgb(1, 2, 3), &opts).unwrap();
        let d = s.scene().get(&id).unwrap();
        let style = d.shape.text_style().unwrap();

        assert_eq!(style.font_style, FontStyle::Italic);
        assert_eq!(style.text_align, TextAlign::Right);
        assert!(style.underline);
        assert_eq!(d.fill, Some(Color::rgb(1, 2, 3)));
        assert_eq!(d.stroke, Some(Color::rgb(0, 0, 255)));
        assert_eq!(d.opacity, 1.0);
    }

    #[test]
    fn test_set_property_without_selection() {
        let mut s = ready();
        s.add_text("Hi", Color::BLACK, &TextOptions::default());
        assert!(!s.set_active_property(&PropertyChange::FontSize(24.0)));
    }

    #[test]
    fn test_set_font_size_changes_only_font_size() {
        let mut s = ready();
        let id = s.add_text("Hi", Color::BLACK, &TextOptions::default()).unwrap();
        s.select(&id);
        let before = s.scene().get(&id).unwrap().clone();

        assert!(s.set_active_property(&PropertyChange::FontSize(24.0)));
        let after = s.scene().get(&id).unwrap().clone();
        assert_eq!(after.shape.text_style().unwrap().font_size, 24.0);

        let mut expected = before;
        if let Some(style) = expected.shape.text_style_mut() {
            assert_eq!(style.font_size, DEFAULT_FONT_SIZE);
            style.font_size = 24.0;
        }
        assert_eq!(after, expected);
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let mut s = ready();
        let id = s.add_text("Hi", Color::BLACK, &TextOptions::default()).unwrap();
        s.select(&id);
        assert!(!s.set_active_property(&PropertyChange::Underline(false)));
        assert!(s.set_active_property(&PropertyChange::Underline(true)));
    }

    #[test]
    fn test_text_property_on_shape_is_ignored() {
        let mut s = ready();
        let id = s.add_shape(ShapeKind::Rect, Color::BLACK, Color::WHITE).unwrap();
        s.select(&id);
        assert!(!s.set_active_property(&PropertyChange::FontFamily("Mono".into())));
        assert!(s.set_active_property(&PropertyChange::Fill(Color::rgb(9, 9, 9))));
        assert_eq!(s.scene().get(&id).unwrap().fill, Some(Color::rgb(9, 9, 9)));
    }
}
