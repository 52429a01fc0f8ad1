//! Hand-written SVG serialization of the scene.

use std::fmt::Write as _;

use kurbo::Affine;
use shared::{Drawable, FontStyle, Scene, Shape, TextStyle};

use super::{drawable_affine, text_box, Download};

/// File name of the vector download
pub const SVG_FILE_NAME: &str = "canvas.svg";

/// Render the scene as a standalone SVG document
pub fn render_svg(scene: &Scene, width: f64, height: f64) -> String {
    let mut out = String::new();
    let (w, h) = (num(width), num(height));
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );
    let _ = write!(
        out,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        scene.background
    );
    for drawable in &scene.objects {
        write_drawable(&mut out, drawable);
    }
    out.push_str("</svg>");
    out
}

/// The scene as a `canvas.svg` download
pub fn svg_download(scene: &Scene, width: f64, height: f64) -> Download {
    Download::new(
        SVG_FILE_NAME,
        "image/svg+xml",
        render_svg(scene, width, height).into_bytes(),
    )
}

fn write_drawable(out: &mut String, drawable: &Drawable) {
    let mut attrs = format!(" transform=\"{}\"", svg_matrix(drawable_affine(drawable)));
    if drawable.opacity < 1.0 {
        let _ = write!(attrs, " opacity=\"{}\"", num(drawable.opacity));
    }
    let paint = paint_attrs(drawable);

    match &drawable.shape {
        Shape::Rect { width, height } => {
            let _ = write!(
                out,
                "<rect width=\"{}\" height=\"{}\"{paint}{attrs}/>",
                num(*width),
                num(*height)
            );
        }
        Shape::Circle { radius } => {
            let r = num(*radius);
            let _ = write!(out, "<circle cx=\"{r}\" cy=\"{r}\" r=\"{r}\"{paint}{attrs}/>");
        }
        Shape::Triangle { width, height } => {
            let _ = write!(
                out,
                "<polygon points=\"{},0 {},{} 0,{}\"{paint}{attrs}/>",
                num(width / 2.0),
                num(*width),
                num(*height),
                num(*height)
            );
        }
        Shape::Path { points } => {
            let pts: Vec<String> = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect();
            let _ = write!(
                out,
                "<polyline points=\"{}\" fill=\"none\"{}{attrs} stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
                pts.join(" "),
                stroke_attrs(drawable)
            );
        }
        Shape::Text { text, style } => {
            let _ = write!(out, "<g{attrs}>");
            if let Some(background) = style.text_background_color {
                let bbox = text_box(text, style);
                let _ = write!(
                    out,
                    "<rect width=\"{}\" height=\"{}\" fill=\"{background}\"/>",
                    num(bbox.width()),
                    num(bbox.height())
                );
            }
            let _ = write!(
                out,
                "<text y=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\"{}{}{paint}>{}</text></g>",
                num(style.font_size),
                escape_xml(&style.font_family),
                num(style.font_size),
                style.font_weight.0,
                font_style_attr(style),
                decoration_attr(style),
                escape_xml(text)
            );
        }
        Shape::Image {
            src, width, height, ..
        } => {
            let _ = write!(
                out,
                "<image href=\"{}\" width=\"{}\" height=\"{}\"{attrs}/>",
                escape_xml(src),
                num(*width),
                num(*height)
            );
        }
        Shape::Group { objects } => {
            let _ = write!(out, "<g{attrs}>");
            for child in objects {
                write_drawable(out, child);
            }
            out.push_str("</g>");
        }
    }
}

fn paint_attrs(drawable: &Drawable) -> String {
    let fill = match drawable.fill {
        Some(color) => format!(" fill=\"{color}\""),
        None => " fill=\"none\"".to_string(),
    };
    fill + &stroke_attrs(drawable)
}

fn stroke_attrs(drawable: &Drawable) -> String {
    match drawable.stroke {
        Some(color) if drawable.stroke_width > 0.0 => format!(
            " stroke=\"{color}\" stroke-width=\"{}\"",
            num(drawable.stroke_width)
        ),
        _ => String::new(),
    }
}

fn font_style_attr(style: &TextStyle) -> &'static str {
    match style.font_style {
        FontStyle::Italic => " font-style=\"italic\"",
        FontStyle::Normal => "",
    }
}

fn decoration_attr(style: &TextStyle) -> String {
    let mut parts = Vec::new();
    if style.underline {
        parts.push("underline");
    }
    if style.overline {
        parts.push("overline");
    }
    if style.linethrough {
        parts.push("line-through");
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" text-decoration=\"{}\"", parts.join(" "))
    }
}

fn svg_matrix(affine: Affine) -> String {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        num(a),
        num(b),
        num(c),
        num(d),
        num(e),
        num(f)
    )
}

/// Compact number formatting (3 decimals, no trailing zeros)
fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
