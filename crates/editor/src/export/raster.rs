//! PNG export on the `vello_cpu` sparse-strip renderer.
//!
//! Drawables are turned into kurbo paths and filled or stroked on a CPU
//! [`RenderContext`]. Text is drawn from glyph outlines when a font has been
//! supplied and as per-character blocks otherwise. Images only carry a source
//! URL, so they are drawn as placeholder frames of their natural size.

use std::io::Cursor;

use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve};
use image::{ImageFormat, RgbaImage};
use shared::{Color, Drawable, Point2D, Scene, Shape, TextAlign, TextStyle};
use vello_cpu::kurbo::{Affine, BezPath, Cap, Circle, Join, Rect, Shape as _, Stroke};
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

use super::{drawable_affine, Download, ExportError, GLYPH_ADVANCE, MAX_MULTIPLIER};

/// File name of the raster download
pub const RASTER_FILE_NAME: &str = "canvas.png";

const TOLERANCE: f64 = 0.1;
/// Baseline offset from the line top, relative to the font size
const FALLBACK_ASCENT: f64 = 0.8;
/// Height of a fallback glyph block, relative to the font size
const BLOCK_HEIGHT: f64 = 0.7;
const PLACEHOLDER_FILL: Color = Color::rgb(221, 221, 221);
const PLACEHOLDER_STROKE: Color = Color::rgb(153, 153, 153);

/// Parse a TrueType/OpenType font for glyph rendering
pub fn load_font(bytes: Vec<u8>) -> Result<FontArc, ExportError> {
    Ok(FontArc::try_from_vec(bytes)?)
}

/// Rasterize the scene at `multiplier` times the canvas size
pub fn render_raster(
    scene: &Scene,
    width: f64,
    height: f64,
    multiplier: f64,
    font: Option<&FontArc>,
) -> Result<RgbaImage, ExportError> {
    if !multiplier.is_finite() || multiplier <= 0.0 || multiplier > MAX_MULTIPLIER {
        return Err(ExportError::InvalidMultiplier(multiplier));
    }

    let w = ((width * multiplier).round() as u32).max(1);
    let h = ((height * multiplier).round() as u32).max(1);
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        return Err(ExportError::SurfaceSize { width: w, height: h });
    };

    let settings = RenderSettings {
        render_mode: RenderMode::OptimizeSpeed,
        ..RenderSettings::default()
    };
    let mut ctx = RenderContext::new_with(w16, h16, settings);

    let mut painter = Painter { ctx: &mut ctx, font };
    painter.fill_rect(
        Affine::IDENTITY,
        Rect::new(0.0, 0.0, w as f64, h as f64),
        scene.background,
        1.0,
    );
    let base = Affine::scale(multiplier);
    for drawable in &scene.objects {
        painter.paint_drawable(base, drawable, 1.0);
    }

    let mut pixmap = Pixmap::new(w16, h16);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let pixels = pixmap.take_unpremultiplied();
    let mut bytes = Vec::with_capacity(pixels.len() * 4);
    for p in pixels {
        bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }
    RgbaImage::from_raw(w, h, bytes).ok_or(ExportError::SurfaceSize { width: w, height: h })
}

/// PNG bytes of a rendered raster
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Render and encode the scene as a `canvas.png` download
pub fn raster_download(
    scene: &Scene,
    width: f64,
    height: f64,
    multiplier: f64,
    font: Option<&FontArc>,
) -> Result<Download, ExportError> {
    let img = render_raster(scene, width, height, multiplier, font)?;
    Ok(Download::new(RASTER_FILE_NAME, "image/png", encode_png(&img)?))
}

fn to_cpu(affine: kurbo::Affine) -> Affine {
    Affine::new(affine.as_coeffs())
}

fn paint(color: Color, opacity: f64) -> peniko::Color {
    let alpha = (color.a as f64 * opacity).round().clamp(0.0, 255.0) as u8;
    peniko::Color::from_rgba8(color.r, color.g, color.b, alpha)
}

fn polyline(points: &[Point2D]) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to((p.x, p.y));
        } else {
            path.line_to((p.x, p.y));
        }
    }
    path
}

/// Closed outline of a filled primitive in object space
fn closed_outline(shape: &Shape) -> Option<BezPath> {
    match shape {
        Shape::Rect { width, height } => {
            Some(Rect::new(0.0, 0.0, *width, *height).to_path(TOLERANCE))
        }
        Shape::Circle { radius } => {
            Some(Circle::new((*radius, *radius), *radius).to_path(TOLERANCE))
        }
        Shape::Triangle { width, height } => {
            let mut path = BezPath::new();
            path.move_to((width / 2.0, 0.0));
            path.line_to((*width, *height));
            path.line_to((0.0, *height));
            path.close_path();
            Some(path)
        }
        _ => None,
    }
}

struct Painter<'a> {
    ctx: &'a mut RenderContext,
    font: Option<&'a FontArc>,
}

impl Painter<'_> {
    fn paint_drawable(&mut self, parent: Affine, drawable: &Drawable, parent_opacity: f64) {
        let affine = parent * to_cpu(drawable_affine(drawable));
        let opacity = parent_opacity * drawable.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        match &drawable.shape {
            Shape::Group { objects } => {
                for child in objects {
                    self.paint_drawable(affine, child, opacity);
                }
            }
            Shape::Image { width, height, .. } => {
                self.paint_placeholder(affine, Rect::new(0.0, 0.0, *width, *height), opacity);
            }
            Shape::Text { text, style } => self.paint_text(affine, drawable, text, style, opacity),
            Shape::Path { points } => {
                if let Some(stroke) = drawable.stroke {
                    self.stroke_path(affine, &polyline(points), stroke, drawable.stroke_width, opacity);
                }
            }
            shape => {
                let Some(outline) = closed_outline(shape) else {
                    return;
                };
                if let Some(fill) = drawable.fill {
                    self.fill_path(affine, &outline, fill, opacity);
                }
                if let Some(stroke) = drawable.stroke {
                    self.stroke_path(affine, &outline, stroke, drawable.stroke_width, opacity);
                }
            }
        }
    }

    fn fill_path(&mut self, affine: Affine, path: &BezPath, color: Color, opacity: f64) {
        self.ctx.set_transform(affine);
        self.ctx.set_paint(paint(color, opacity));
        self.ctx.fill_path(path);
    }

    fn fill_rect(&mut self, affine: Affine, rect: Rect, color: Color, opacity: f64) {
        self.ctx.set_transform(affine);
        self.ctx.set_paint(paint(color, opacity));
        self.ctx.fill_rect(&rect);
    }

    fn stroke_path(&mut self, affine: Affine, path: &BezPath, color: Color, width: f64, opacity: f64) {
        if width <= 0.0 {
            return;
        }
        self.ctx.set_transform(affine);
        self.ctx.set_paint(paint(color, opacity));
        self.ctx.set_stroke(
            Stroke::new(width)
                .with_caps(Cap::Round)
                .with_join(Join::Round),
        );
        self.ctx.stroke_path(path);
    }

    /// Grey frame with both diagonals
    fn paint_placeholder(&mut self, affine: Affine, frame: Rect, opacity: f64) {
        self.fill_rect(affine, frame, PLACEHOLDER_FILL, opacity);
        let mut cross = frame.to_path(TOLERANCE);
        cross.move_to((frame.x0, frame.y0));
        cross.line_to((frame.x1, frame.y1));
        cross.move_to((frame.x1, frame.y0));
        cross.line_to((frame.x0, frame.y1));
        self.stroke_path(affine, &cross, PLACEHOLDER_STROKE, 2.0, opacity);
    }

    fn paint_text(
        &mut self,
        affine: Affine,
        drawable: &Drawable,
        text: &str,
        style: &TextStyle,
        opacity: f64,
    ) {
        let layout = TextLayout::new(text, style, self.font);

        if let Some(background) = style.text_background_color {
            self.fill_rect(affine, layout.bounds(), background, opacity);
        }
        let Some(fill) = drawable.fill else {
            return;
        };

        let mut glyphs = BezPath::new();
        let mut decorations = BezPath::new();
        for line in &layout.lines {
            let x = layout.line_start(line);
            match self.font {
                Some(font) => append_glyphs(&mut glyphs, font, line.text, style, x, line.baseline),
                None => append_blocks(&mut glyphs, line.text, style, x, line.baseline),
            }
            append_decorations(&mut decorations, style, x, line);
        }

        self.fill_path(affine, &glyphs, fill, opacity);
        if style.font_weight.is_bold() {
            self.stroke_path(affine, &glyphs, fill, style.font_size / 30.0, opacity);
        }
        self.fill_path(affine, &decorations, fill, opacity);
    }
}

// ── Text layout ──────────────────────────────────────────

struct LaidLine<'t> {
    text: &'t str,
    top: f64,
    baseline: f64,
    width: f64,
}

/// Line boxes of a text block, measured with the font when one is loaded
struct TextLayout<'t> {
    lines: Vec<LaidLine<'t>>,
    width: f64,
    height: f64,
    align: TextAlign,
}

impl<'t> TextLayout<'t> {
    fn new(text: &'t str, style: &TextStyle, font: Option<&FontArc>) -> Self {
        let line_box = style.font_size * style.line_height;
        let ascent = match font {
            Some(font) => font_scale(font, style) * font.ascent_unscaled() as f64,
            None => style.font_size * FALLBACK_ASCENT,
        };

        let lines: Vec<LaidLine<'t>> = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let top = i as f64 * line_box;
                LaidLine {
                    text: line,
                    top,
                    baseline: top + ascent,
                    width: match font {
                        Some(font) => glyph_run_width(font, line, style),
                        None => line.chars().count() as f64 * block_advance(style),
                    },
                }
            })
            .collect();

        let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let height = lines.len().max(1) as f64 * line_box;
        Self {
            lines,
            width,
            height,
            align: style.text_align,
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn line_start(&self, line: &LaidLine<'_>) -> f64 {
        let slack = self.width - line.width;
        match self.align {
            TextAlign::Left | TextAlign::Justify => 0.0,
            TextAlign::Center => slack / 2.0,
            TextAlign::Right => slack,
        }
    }
}

fn block_advance(style: &TextStyle) -> f64 {
    style.font_size * (GLYPH_ADVANCE + style.char_spacing / 1000.0)
}

fn font_scale(font: &FontArc, style: &TextStyle) -> f64 {
    font.units_per_em()
        .map(|upem| style.font_size / upem as f64)
        .unwrap_or(0.0)
}

fn glyph_run_width(font: &FontArc, line: &str, style: &TextStyle) -> f64 {
    let mut width = 0.0;
    walk_glyphs(font, line, style, 0.0, |_, _, after| width = after);
    width
}

/// Visit each glyph with its pen position before and after its advance
fn walk_glyphs(
    font: &FontArc,
    line: &str,
    style: &TextStyle,
    start: f64,
    mut visit: impl FnMut(GlyphId, f64, f64),
) {
    let scale = font_scale(font, style);
    let tracking = style.font_size * style.char_spacing / 1000.0;
    let mut x = start;
    let mut prev: Option<GlyphId> = None;
    for c in line.chars() {
        let id = font.glyph_id(c);
        if let Some(prev) = prev {
            x += font.kern_unscaled(prev, id) as f64 * scale;
        }
        let next = x + font.h_advance_unscaled(id) as f64 * scale + tracking;
        visit(id, x, next);
        x = next;
        prev = Some(id);
    }
}

fn append_glyphs(
    path: &mut BezPath,
    font: &FontArc,
    line: &str,
    style: &TextStyle,
    start: f64,
    baseline: f64,
) {
    let scale = font_scale(font, style);
    walk_glyphs(font, line, style, start, |id, x, _| {
        let Some(outline) = font.outline(id) else {
            return;
        };
        // Font units are y-up
        let map = |p: &ab_glyph::Point| (x + p.x as f64 * scale, baseline - p.y as f64 * scale);

        let mut pen: Option<(f64, f64)> = None;
        for curve in &outline.curves {
            let (from, to) = match curve {
                OutlineCurve::Line(p0, p1) => (map(p0), map(p1)),
                OutlineCurve::Quad(p0, _, p2) => (map(p0), map(p2)),
                OutlineCurve::Cubic(p0, _, _, p3) => (map(p0), map(p3)),
            };
            if pen != Some(from) {
                if pen.is_some() {
                    path.close_path();
                }
                path.move_to(from);
            }
            match curve {
                OutlineCurve::Line(..) => path.line_to(to),
                OutlineCurve::Quad(_, p1, _) => path.quad_to(map(p1), to),
                OutlineCurve::Cubic(_, p1, p2, _) => path.curve_to(map(p1), map(p2), to),
            }
            pen = Some(to);
        }
        if pen.is_some() {
            path.close_path();
        }
    });
}

/// One solid block per visible character
fn append_blocks(path: &mut BezPath, line: &str, style: &TextStyle, start: f64, baseline: f64) {
    let advance = block_advance(style);
    let top = baseline - style.font_size * BLOCK_HEIGHT;
    for (i, c) in line.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let x = start + i as f64 * advance;
        path.extend(Rect::new(x + advance * 0.1, top, x + advance * 0.9, baseline).path_elements(TOLERANCE));
    }
}

fn append_decorations(path: &mut BezPath, style: &TextStyle, start: f64, line: &LaidLine<'_>) {
    let thickness = (style.font_size / 15.0).max(1.0);
    let mut rule = |y: f64| {
        path.extend(Rect::new(start, y, start + line.width, y + thickness).path_elements(TOLERANCE));
    };
    if style.underline {
        rule(line.baseline + style.font_size * 0.1);
    }
    if style.overline {
        rule(line.top);
    }
    if style.linethrough {
        rule(line.baseline - style.font_size * 0.3);
    }
}
