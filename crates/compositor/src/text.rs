//! Text measurement, fitting and drawing on RGBA canvases.
//!
//! Glyph coverage is rasterized into a grayscale mask with `imageproc` and
//! then painted onto the canvas, which lets strokes be produced by dilating
//! the same mask.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::morphology::dilate;
use storefront_catalog::Color;

use crate::raster::blend_mask;

/// Outline drawn around glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    pub width: u8,
}

/// How a line of text is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPaint {
    pub fill: Color,
    pub opacity: u8,
    pub stroke: Option<Stroke>,
}

impl TextPaint {
    pub fn solid(fill: Color) -> Self {
        Self {
            fill,
            opacity: 255,
            stroke: None,
        }
    }

    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_stroke(mut self, color: Color, width: u8) -> Self {
        self.stroke = (width > 0).then_some(Stroke { color, width });
        self
    }
}

/// Vertical extent of one line at `px`.
pub fn line_height(font: &FontArc, px: f32) -> f32 {
    font.as_scaled(PxScale::from(px)).height()
}

/// Advance width of a single line.
pub fn line_width(font: &FontArc, px: f32, text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }
    text_size(PxScale::from(px), font, text).0
}

/// Width of the widest `\n`-separated line.
pub fn block_width(font: &FontArc, px: f32, text: &str) -> u32 {
    text.lines()
        .map(|line| line_width(font, px, line))
        .max()
        .unwrap_or(0)
}

/// One positioned line of a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub text: String,
    pub width: u32,
    pub height: u32,
    /// Top of the line relative to the top of the block.
    pub offset_y: i64,
}

/// A multi-line block laid out at a given size.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub px: f32,
    pub lines: Vec<LineLayout>,
    pub width: u32,
    pub height: u32,
}

/// Lay out `text` line by line; `spacing` is the gap between lines as a
/// fraction of the line height.
pub fn layout_block(font: &FontArc, px: f32, text: &str, spacing: f32) -> BlockLayout {
    let height = line_height(font, px).ceil().max(1.0) as u32;
    let advance = (height as f32 * (1.0 + spacing)).round() as i64;

    let lines: Vec<LineLayout> = text
        .lines()
        .enumerate()
        .map(|(i, line)| LineLayout {
            text: line.to_string(),
            width: line_width(font, px, line),
            height,
            offset_y: i as i64 * advance,
        })
        .collect();

    let width = lines.iter().map(|l| l.width).max().unwrap_or(0);
    let total = lines
        .last()
        .map_or(0, |l| (l.offset_y + l.height as i64) as u32);

    BlockLayout {
        px,
        lines,
        width,
        height: total,
    }
}

/// Largest size `<= nominal` at which every line fits in `max_width`.
///
/// Starts from the proportional shrink `nominal * max_width / width` and
/// steps down until the block fits, never going below `min_px`.
pub fn fit_size(font: &FontArc, text: &str, nominal: f32, min_px: f32, max_width: u32) -> f32 {
    let min_px = min_px.max(1.0).min(nominal);
    let measured = block_width(font, nominal, text);
    if measured <= max_width || measured == 0 {
        return nominal;
    }

    let mut px = (nominal * max_width as f32 / measured as f32).max(min_px);
    while px > min_px && block_width(font, px, text) > max_width {
        px = (px * 0.98).max(min_px);
    }
    px
}

/// Coverage mask of one line with `pad` pixels of margin on every side.
pub fn line_mask(font: &FontArc, px: f32, text: &str, pad: u32) -> GrayImage {
    let width = line_width(font, px, text) + 2 * pad;
    let height = line_height(font, px).ceil().max(1.0) as u32 + 2 * pad;
    let mut mask = GrayImage::new(width, height);
    draw_text_mut(
        &mut mask,
        Luma([255u8]),
        pad as i32,
        pad as i32,
        PxScale::from(px),
        font,
        text,
    );
    mask
}

/// Draw one line with its top-left corner at `(x, y)`.
pub fn draw_line(
    canvas: &mut RgbaImage,
    font: &FontArc,
    px: f32,
    text: &str,
    x: i64,
    y: i64,
    paint: &TextPaint,
) {
    if text.is_empty() {
        return;
    }
    let overhang = (px * 0.1).ceil() as u32;
    let pad = overhang + paint.stroke.map_or(0, |s| s.width as u32);
    let mask = line_mask(font, px, text, pad);
    let (mx, my) = (x - pad as i64, y - pad as i64);

    if let Some(stroke) = paint.stroke {
        let outline = dilate(&mask, Norm::L2, stroke.width);
        blend_mask(canvas, &outline, mx, my, stroke.color, paint.opacity);
    }
    blend_mask(canvas, &mask, mx, my, paint.fill, paint.opacity);
}

/// Draw a laid-out block with every line centered on `center_x`.
pub fn draw_block_centered(
    canvas: &mut RgbaImage,
    font: &FontArc,
    block: &BlockLayout,
    center_x: i64,
    top: i64,
    paint: &TextPaint,
) {
    for line in &block.lines {
        let x = center_x - line.width as i64 / 2;
        draw_line(canvas, font, block.px, &line.text, x, top + line.offset_y, paint);
    }
}
