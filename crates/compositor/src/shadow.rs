//! Drop-shadow compositing.

use image::imageops;
use image::{GrayImage, Luma, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use serde::{Deserialize, Serialize};
use storefront_catalog::{CanvasSize, Color};

/// Soft drop shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowStyle {
    /// Shadow displacement in pixels (x, y).
    pub offset: (i32, i32),

    /// Gaussian sigma in pixels.
    pub blur_radius: f32,

    /// Peak shadow opacity (0-255).
    pub opacity: u8,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            offset: (10, 10),
            blur_radius: 20.0,
            opacity: 70,
        }
    }
}

impl ShadowStyle {
    /// Style scaled to the canvas: width-driven for portrait, height-driven
    /// for landscape.
    pub fn for_canvas(size: CanvasSize) -> Self {
        let (offset, blur) = if size.is_portrait() {
            let w = size.width as f64;
            ((w * 0.006).max(5.0), (w * 0.014).max(10.0))
        } else {
            let h = size.height as f64;
            ((h * 0.005).max(4.0), (h * 0.012).max(8.0))
        };
        let offset = offset as i32;
        Self {
            offset: (offset, offset),
            blur_radius: blur.floor() as f32,
            opacity: 70,
        }
    }

    /// Buffer padding on each side of the source.
    pub fn pad(&self) -> u32 {
        (self.blur_radius.max(0.0) * 3.0).ceil() as u32
    }
}

/// Composite `source` onto `canvas` at `position` with a drop shadow.
///
/// Returns a new image with the canvas dimensions; anything falling
/// outside the canvas is clipped.
pub fn composite_with_shadow(
    canvas: &RgbaImage,
    source: &RgbaImage,
    position: (i64, i64),
    style: &ShadowStyle,
) -> RgbaImage {
    let mut out = canvas.clone();
    let pad = style.pad();

    let mut shape = GrayImage::new(source.width() + 2 * pad, source.height() + 2 * pad);
    for (x, y, px) in source.enumerate_pixels() {
        let a = (px[3] as u32 * style.opacity as u32 + 127) / 255;
        shape.put_pixel(x + pad, y + pad, Luma([a as u8]));
    }
    if style.blur_radius > 0.0 {
        shape = gaussian_blur_f32(&shape, style.blur_radius);
    }

    // Shape already carries the opacity, so paint it at full strength.
    crate::raster::blend_mask(
        &mut out,
        &shape,
        position.0 + style.offset.0 as i64 - pad as i64,
        position.1 + style.offset.1 as i64 - pad as i64,
        Color::BLACK,
        255,
    );

    imageops::overlay(&mut out, source, position.0, position.1);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(200, 150, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_source_drawn_on_top() {
        let source = RgbaImage::from_pixel(40, 30, Rgba([200, 10, 10, 255]));
        let out = composite_with_shadow(&canvas(), &source, (50, 40), &ShadowStyle::default());
        assert_eq!(out.get_pixel(60, 50), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_shadow_darkens_offset_region() {
        let source = RgbaImage::from_pixel(40, 30, Rgba([200, 10, 10, 255]));
        let style = ShadowStyle {
            offset: (10, 10),
            blur_radius: 2.0,
            opacity: 70,
        };
        let out = composite_with_shadow(&canvas(), &source, (50, 40), &style);
        // Just past the source's bottom-right corner, inside the shadow.
        let px = out.get_pixel(94, 74);
        assert!(px[0] < 255);
        assert_eq!(px[0], px[1]);
        // Far away stays untouched.
        assert_eq!(out.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let base = canvas();
        let before = base.clone();
        let source = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));
        let _ = composite_with_shadow(&base, &source, (0, 0), &ShadowStyle::default());
        assert_eq!(base.as_raw(), before.as_raw());
    }

    #[test]
    fn test_style_scales_with_canvas() {
        let portrait = ShadowStyle::for_canvas(CanvasSize::new(1284, 2778));
        assert_eq!(portrait.offset, (7, 7));
        assert_eq!(portrait.blur_radius, 17.0);

        let small = ShadowStyle::for_canvas(CanvasSize::new(100, 200));
        assert_eq!(small.offset, (5, 5));
        assert_eq!(small.blur_radius, 10.0);
    }

    proptest! {
        #[test]
        fn shadow_never_changes_canvas_size(
            cw in 1u32..120,
            ch in 1u32..120,
            sw in 1u32..80,
            sh in 1u32..80,
            x in -100i64..150,
            y in -100i64..150,
            blur in 0.0f32..6.0,
        ) {
            let canvas = RgbaImage::from_pixel(cw, ch, Rgba([10, 20, 30, 255]));
            let source = RgbaImage::from_pixel(sw, sh, Rgba([250, 250, 250, 255]));
            let style = ShadowStyle { offset: (4, 4), blur_radius: blur, opacity: 70 };
            let out = composite_with_shadow(&canvas, &source, (x, y), &style);
            prop_assert_eq!(out.dimensions(), (cw, ch));
        }
    }
}
