//! Vertical two-color gradient backgrounds.

use image::{Rgb, RgbImage};
use storefront_catalog::Color;

/// Render a `width x height` vertical gradient from `top` to `bottom`.
///
/// Row `y` is `top + (bottom - top) * y / (height - 1)`, rounded per
/// channel and replicated across the row. A single-row image is solid `top`.
pub fn render_gradient(width: u32, height: u32, top: Color, bottom: Color) -> RgbImage {
    let denominator = height.saturating_sub(1).max(1) as f64;
    let rows: Vec<Rgb<u8>> = (0..height)
        .map(|y| {
            let c = top.lerp(bottom, y as f64 / denominator);
            Rgb([c.r, c.g, c.b])
        })
        .collect();

    RgbImage::from_fn(width, height, |_, y| rows[y as usize])
}
