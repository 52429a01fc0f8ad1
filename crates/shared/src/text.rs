//! Text styling types: the stored style of a text drawable, the option bag
//! used when creating text, and single-property edits.

use serde::{Deserialize, Serialize};

use crate::Color;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.16;

/// Numeric CSS font weight (400 = normal, 700 = bold)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    pub fn is_bold(&self) -> bool {
        self.0 >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Shorthand decoration; sets exactly one of the decoration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    None,
    Underline,
    Overline,
    Linethrough,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_line_height() -> f64 {
    DEFAULT_LINE_HEIGHT
}

/// Typography stored on a text drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub overline: bool,
    #[serde(default)]
    pub linethrough: bool,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Tracking in thousandths of an em
    #[serde(default)]
    pub char_spacing: f64,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_background_color: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
            underline: false,
            overline: false,
            linethrough: false,
            line_height: DEFAULT_LINE_HEIGHT,
            char_spacing: 0.0,
            text_align: TextAlign::Left,
            text_background_color: None,
        }
    }
}

impl TextStyle {
    pub fn set_decoration(&mut self, decoration: TextDecoration) {
        self.underline = decoration == TextDecoration::Underline;
        self.overline = decoration == TextDecoration::Overline;
        self.linethrough = decoration == TextDecoration::Linethrough;
    }
}

/// Options accepted when creating a text drawable. Unset fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub opacity: Option<f64>,
    pub fill: Option<Color>,
    pub underline: Option<bool>,
    pub overline: Option<bool>,
    pub linethrough: Option<bool>,
    pub background_color: Option<Color>,
    pub border_color: Option<Color>,
    pub font_size: Option<f64>,
    pub line_height: Option<f64>,
    pub char_spacing: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub font_family: Option<String>,
    pub text_decoration: Option<TextDecoration>,
}

impl TextOptions {
    /// Apply the typography part of the options to a style.
    /// `text_decoration` is applied first so explicit flags win over it.
    pub fn apply_to_style(&self, style: &mut TextStyle) {
        if let Some(decoration) = self.text_decoration {
            style.set_decoration(decoration);
        }
        if let Some(v) = self.underline {
            style.underline = v;
        }
        if let Some(v) = self.overline {
            style.overline = v;
        }
        if let Some(v) = self.linethrough {
            style.linethrough = v;
        }
        if let Some(v) = self.background_color {
            style.text_background_color = Some(v);
        }
        if let Some(v) = self.font_size {
            style.font_size = v;
        }
        if let Some(v) = self.line_height {
            style.line_height = v;
        }
        if let Some(v) = self.char_spacing {
            style.char_spacing = v;
        }
        if let Some(v) = self.font_weight {
            style.font_weight = v;
        }
        if let Some(v) = self.font_style {
            style.font_style = v;
        }
        if let Some(v) = self.text_align {
            style.text_align = v;
        }
        if let Some(v) = &self.font_family {
            style.font_family = v.clone();
        }
    }
}

/// A single-property edit on the active drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "prop", content = "value", rename_all = "snake_case")]
pub enum PropertyChange {
    FontSize(f64),
    FontFamily(String),
    FontWeight(FontWeight),
    FontStyle(FontStyle),
    Underline(bool),
    Linethrough(bool),
    Overline(bool),
    Fill(Color),
    CharSpacing(f64),
    TextBackgroundColor(Option<Color>),
    LineHeight(f64),
    TextAlign(TextAlign),
    Stroke(Color),
}

impl PropertyChange {
    /// Build an edit from a property name and its raw JSON value
    pub fn from_prop(prop: &str, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({ "prop": prop, "value": value }))
    }

    /// Whether this edit only makes sense on text drawables
    pub fn is_text_only(&self) -> bool {
        !matches!(self, PropertyChange::Fill(_) | PropertyChange::Stroke(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PropertyChange::FontSize(_) => "font_size",
            PropertyChange::FontFamily(_) => "font_family",
            PropertyChange::FontWeight(_) => "font_weight",
            PropertyChange::FontStyle(_) => "font_style",
            PropertyChange::Underline(_) => "underline",
            PropertyChange::Linethrough(_) => "linethrough",
            PropertyChange::Overline(_) => "overline",
            PropertyChange::Fill(_) => "fill",
            PropertyChange::CharSpacing(_) => "char_spacing",
            PropertyChange::TextBackgroundColor(_) => "text_background_color",
            PropertyChange::LineHeight(_) => "line_height",
            PropertyChange::TextAlign(_) => "text_align",
            PropertyChange::Stroke(_) => "stroke",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_change_from_prop() {
        let change = PropertyChange::from_prop("font_size", serde_json::json!(24)).unwrap();
        assert_eq!(change, PropertyChange::FontSize(24.0));
        let change = PropertyChange::from_prop("text_background_color", serde_json::Value::Null)
            .unwrap();
        assert_eq!(change, PropertyChange::TextBackgroundColor(None));
        assert!(PropertyChange::from_prop("glow", serde_json::json!(1)).is_err());
    }

    #[test]
    fn test_decoration_sets_single_flag() {
        let mut style = TextStyle::default();
        style.set_decoration(TextDecoration::Overline);
        assert!(style.overline);
        assert!(!style.underline);
        style.set_decoration(TextDecoration::None);
        assert!(!style.overline);
    }

    #[test]
    fn test_explicit_flag_wins_over_decoration() {
        let opts = TextOptions {
            text_decoration: Some(TextDecoration::Underline),
            underline: Some(false),
            linethrough: Some(true),
            ..Default::default()
        };
        let mut style = TextStyle::default();
        opts.apply_to_style(&mut style);
        assert!(!style.underline);
        assert!(style.linethrough);
    }

    #[test]
    fn test_options_leave_unset_fields() {
        let opts = TextOptions {
            font_size: Some(32.0),
            ..Default::default()
        };
        let mut style = TextStyle::default();
        opts.apply_to_style(&mut style);
        assert_eq!(style.font_size, 32.0);
        assert_eq!(style.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(style.line_height, DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_property_change_serde() {
        let json = r#"{"prop": "font_size", "value": 24}"#;
        let change: PropertyChange = serde_json::from_str(json).unwrap();
        assert_eq!(change, PropertyChange::FontSize(24.0));

        let json = r##"{"prop": "fill", "value": "#00ff00"}"##;
        let change: PropertyChange = serde_json::from_str(json).unwrap();
        assert_eq!(change, PropertyChange::Fill(Color::rgb(0, 255, 0)));
        assert!(!change.is_text_only());

        let json = r#"{"prop": "text_background_color", "value": null}"#;
        let change: PropertyChange = serde_json::from_str(json).unwrap();
        assert_eq!(change, PropertyChange::TextBackgroundColor(None));
    }

    #[test]
    fn test_text_options_from_partial_json() {
        let json = r#"{"font_style": "italic", "text_align": "center", "font_weight": 700}"#;
        let opts: TextOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.font_style, Some(FontStyle::Italic));
        assert_eq!(opts.text_align, Some(TextAlign::Center));
        assert_eq!(opts.font_weight, Some(FontWeight::BOLD));
        assert!(opts.fill.is_none());
    }
}
