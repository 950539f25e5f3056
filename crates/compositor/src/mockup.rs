//! Phone-frame mockups around screen content.

use image::imageops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use storefront_catalog::Color;

use crate::raster::{apply_mask, blend_mask, cover, rounded_rect, rounded_rect_mask};

/// Phone height / width.
pub const PHONE_ASPECT: f64 = 2.076;

/// Body corner radius as a fraction of phone width.
const BODY_RADIUS_RATIO: f64 = 0.13;
/// Screen corner radius as a fraction of the body radius.
const SCREEN_RADIUS_RATIO: f64 = 0.82;
const BEZEL_RATIO: f64 = 0.035;
const BORDER_RATIO: f64 = 0.012;
const ISLAND_WIDTH_RATIO: f64 = 0.30;
const ISLAND_ASPECT: f64 = 0.29;
const ISLAND_TOP_RATIO: f64 = 0.035;

const BODY_COLOR: Color = Color::rgb(20, 20, 24);
const ISLAND_COLOR: Color = Color::BLACK;

/// Phone frame geometry, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockupSpec {
    pub phone_width: u32,
    pub phone_height: u32,
    /// Dark body margin around the screen.
    pub bezel: u32,
    /// Accent ring outside the body.
    pub border: u32,
    pub accent: Color,
}

impl MockupSpec {
    /// Proportional frame for a phone of the given width.
    pub fn for_width(phone_width: u32, accent: Color) -> Self {
        let w = phone_width as f64;
        Self {
            phone_width,
            phone_height: (w * PHONE_ASPECT).round() as u32,
            bezel: ((w * BEZEL_RATIO).round() as u32).max(2),
            border: ((w * BORDER_RATIO).round() as u32).max(2),
            accent,
        }
    }

    /// Final mockup dimensions including the accent border.
    pub fn outer_size(&self) -> (u32, u32) {
        (
            self.phone_width + 2 * self.border,
            self.phone_height + 2 * self.border,
        )
    }

    /// Screen area inside the bezel.
    pub fn screen_size(&self) -> (u32, u32) {
        (
            self.phone_width.saturating_sub(2 * self.bezel),
            self.phone_height.saturating_sub(2 * self.bezel),
        )
    }

    fn body_radius(&self) -> u32 {
        (self.phone_width as f64 * BODY_RADIUS_RATIO).round() as u32
    }
}

/// Wrap `screen` in a rounded phone frame.
///
/// The result is exactly [`MockupSpec::outer_size`], transparent outside
/// the rounded outline.
pub fn build_phone_mockup(screen: &RgbaImage, spec: &MockupSpec) -> RgbaImage {
    let (outer_w, outer_h) = spec.outer_size();
    let body_radius = spec.body_radius();

    let mut out = rounded_rect(
        outer_w,
        outer_h,
        body_radius + spec.border,
        spec.accent,
        255,
    );

    let body = rounded_rect_mask(spec.phone_width, spec.phone_height, body_radius);
    blend_mask(
        &mut out,
        &body,
        spec.border as i64,
        spec.border as i64,
        BODY_COLOR,
        255,
    );

    let (screen_w, screen_h) = spec.screen_size();
    if screen_w == 0 || screen_h == 0 {
        return out;
    }

    let mut content = if screen.dimensions() == (screen_w, screen_h) {
        screen.clone()
    } else {
        cover(screen, screen_w, screen_h)
    };
    let screen_radius = (body_radius as f64 * SCREEN_RADIUS_RATIO).round() as u32;
    apply_mask(
        &mut content,
        &rounded_rect_mask(screen_w, screen_h, screen_radius),
    );
    let origin = (spec.border + spec.bezel) as i64;
    imageops::overlay(&mut out, &content, origin, origin);

    let island_w = (screen_w as f64 * ISLAND_WIDTH_RATIO).round() as u32;
    let island_h = (island_w as f64 * ISLAND_ASPECT).round() as u32;
    if island_w > 0 && island_h > 0 {
        let island = rounded_rect_mask(island_w, island_h, island_h / 2);
        let x = origin + ((screen_w - island_w) / 2) as i64;
        let y = origin + (screen_w as f64 * ISLAND_TOP_RATIO).round() as i64;
        blend_mask(&mut out, &island, x, y, ISLAND_COLOR, 255);
    }

    out
}
