//! Low-level raster helpers shared by the renderers.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use storefront_catalog::Color;

/// Straight-alpha "over" of a single pixel.
pub fn blend_over(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Paint `color` through a coverage mask placed at `(x, y)`.
///
/// Mask value 255 means full coverage; `opacity` scales the result.
/// Parts of the mask outside the canvas are clipped.
pub fn blend_mask(
    canvas: &mut RgbaImage,
    mask: &GrayImage,
    x: i64,
    y: i64,
    color: Color,
    opacity: u8,
) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for (mx, my, Luma([coverage])) in mask.enumerate_pixels() {
        if *coverage == 0 {
            continue;
        }
        let px = x + mx as i64;
        let py = y + my as i64;
        if px < 0 || py < 0 || px >= cw || py >= ch {
            continue;
        }
        let alpha = (*coverage as u32 * opacity as u32 + 127) / 255;
        let dst = canvas.get_pixel_mut(px as u32, py as u32);
        blend_over(dst, color.with_alpha(alpha as u8));
    }
}

/// Filled rounded-rectangle coverage mask of `width x height`.
pub fn rounded_rect_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }
    let r = radius.min(width / 2).min(height / 2);
    let fill = Luma([255u8]);

    if r == 0 {
        draw_filled_rect_mut(&mut mask, Rect::at(0, 0).of_size(width, height), fill);
        return mask;
    }

    if width > 2 * r {
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(r as i32, 0).of_size(width - 2 * r, height),
            fill,
        );
    }
    if height > 2 * r {
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(0, r as i32).of_size(width, height - 2 * r),
            fill,
        );
    }

    let (w, h, r) = (width as i32, height as i32, r as i32);
    for center in [
        (r, r),
        (w - 1 - r, r),
        (r, h - 1 - r),
        (w - 1 - r, h - 1 - r),
    ] {
        draw_filled_circle_mut(&mut mask, center, r, fill);
    }
    mask
}

/// Solid rounded rectangle in `color`, transparent outside the shape.
pub fn rounded_rect(width: u32, height: u32, radius: u32, color: Color, alpha: u8) -> RgbaImage {
    let mut out = RgbaImage::new(width, height);
    let mask = rounded_rect_mask(width, height, radius);
    blend_mask(&mut out, &mask, 0, 0, color, alpha);
    out
}

/// Multiply the alpha channel of `image` by `mask` (same dimensions).
pub fn apply_mask(image: &mut RgbaImage, mask: &GrayImage) {
    for (x, y, px) in image.enumerate_pixels_mut() {
        let m = mask.get_pixel_checked(x, y).map_or(0, |p| p[0]) as u32;
        px[3] = ((px[3] as u32 * m + 127) / 255) as u8;
    }
}

/// Scale to `width`, preserving aspect ratio (Lanczos3).
pub fn scale_to_width(image: &RgbaImage, width: u32) -> RgbaImage {
    if image.width() == 0 || width == 0 {
        return RgbaImage::new(width, 0);
    }
    let height = ((image.height() as f64 * width as f64 / image.width() as f64).round() as u32).max(1);
    imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Scale to cover `width x height`, then center-crop (Lanczos3).
pub fn cover(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 || width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }
    let scale = (width as f64 / image.width() as f64).max(height as f64 / image.height() as f64);
    let sw = ((image.width() as f64 * scale).ceil() as u32).max(width);
    let sh = ((image.height() as f64 * scale).ceil() as u32).max(height);
    let scaled = imageops::resize(image, sw, sh, FilterType::Lanczos3);
    imageops::crop_imm(&scaled, (sw - width) / 2, (sh - height) / 2, width, height).to_image()
}

/// Opaque `width x height` tile filled with `color`.
pub fn solid(width: u32, height: u32, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color.with_alpha(255)))
}
