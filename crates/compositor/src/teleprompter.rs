//! Teleprompter overlay drawn on the phone screen.

use ab_glyph::FontArc;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use storefront_catalog::{Color, TeleprompterLines};

use crate::raster::{blend_over, blend_mask, rounded_rect_mask};
use crate::text::{draw_line, fit_size, line_height, line_width, TextPaint};

/// Vertical darkening behind the teleprompter text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayPolicy {
    /// Solid band from the top down to `start`, fading to clear at `end`.
    /// Fractions of screen height.
    AnchoredBand { start: f32, end: f32, peak_alpha: u8 },

    /// Gaussian falloff around `center` with spread `sigma`, both fractions
    /// of screen height.
    CenteredGaussian {
        center: f32,
        sigma: f32,
        peak_alpha: u8,
    },
}

impl Default for OverlayPolicy {
    fn default() -> Self {
        Self::AnchoredBand {
            start: 0.30,
            end: 0.42,
            peak_alpha: 170,
        }
    }
}

impl OverlayPolicy {
    /// Centered Gaussian with the usual parameters.
    pub fn centered() -> Self {
        Self::CenteredGaussian {
            center: 0.22,
            sigma: 0.12,
            peak_alpha: 180,
        }
    }

    /// Darkening alpha for row `y` of a `height`-row screen.
    pub fn alpha_at(&self, y: u32, height: u32) -> u8 {
        if height == 0 {
            return 0;
        }
        let t = y as f32 / height as f32;
        let alpha = match *self {
            Self::AnchoredBand {
                start,
                end,
                peak_alpha,
            } => {
                if t <= start {
                    peak_alpha as f32
                } else if t >= end || end <= start {
                    0.0
                } else {
                    peak_alpha as f32 * (end - t) / (end - start)
                }
            }
            Self::CenteredGaussian {
                center,
                sigma,
                peak_alpha,
            } => {
                if sigma <= 0.0 {
                    0.0
                } else {
                    let d = t - center;
                    peak_alpha as f32 * (-(d * d) / (2.0 * sigma * sigma)).exp()
                }
            }
        };
        alpha.round().clamp(0.0, 255.0) as u8
    }

    /// Vertical center of the text block, as a fraction of height.
    pub fn text_center(&self) -> f32 {
        match *self {
            Self::AnchoredBand { start, .. } => start / 2.0,
            Self::CenteredGaussian { center, .. } => center,
        }
    }
}

/// Look of the overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleprompterStyle {
    pub policy: OverlayPolicy,

    /// Base text size as a fraction of screen width.
    pub unit_ratio: f32,

    /// Size multiplier of the current (middle) line.
    pub emphasis: f32,

    /// Distance between line centers, in units.
    pub line_gap: f32,

    /// Opacity of the previous/next lines.
    pub dim_alpha: u8,

    pub text_color: Color,

    /// Color of the "currently read" bar.
    pub accent: Color,

    /// Lines wider than this fraction of the screen are shrunk.
    pub max_width_ratio: f32,
}

impl Default for TeleprompterStyle {
    fn default() -> Self {
        Self {
            policy: OverlayPolicy::default(),
            unit_ratio: 0.055,
            emphasis: 1.25,
            line_gap: 1.9,
            dim_alpha: 140,
            text_color: Color::WHITE,
            accent: Color::rgb(255, 107, 107),
            max_width_ratio: 0.90,
        }
    }
}

impl TeleprompterStyle {
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    pub fn with_policy(mut self, policy: OverlayPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Darken `screen` per the overlay policy and draw three lines of text.
pub fn apply_teleprompter(
    screen: &RgbaImage,
    lines: &TeleprompterLines,
    font: &FontArc,
    style: &TeleprompterStyle,
) -> RgbaImage {
    let mut out = screen.clone();
    let (width, height) = out.dimensions();
    if width == 0 || height == 0 {
        return out;
    }

    for y in 0..height {
        let alpha = style.policy.alpha_at(y, height);
        if alpha == 0 {
            continue;
        }
        for x in 0..width {
            blend_over(out.get_pixel_mut(x, y), Color::BLACK.with_alpha(alpha));
        }
    }

    let unit = (width as f32 * style.unit_ratio).max(1.0);
    let max_width = (width as f32 * style.max_width_ratio) as u32;
    let center_y = style.policy.text_center() * height as f32;

    for (i, line) in lines.iter().enumerate() {
        let emphasized = i == 1;
        let nominal = if emphasized { unit * style.emphasis } else { unit };
        let px = fit_size(font, line, nominal, 1.0, max_width);
        let line_w = line_width(font, px, line) as i64;
        let line_h = line_height(font, px);

        let line_center = center_y + (i as f32 - 1.0) * style.line_gap * unit;
        let top = (line_center - line_h / 2.0).round() as i64;
        let x = (width as i64 - line_w) / 2;

        let paint = TextPaint::solid(style.text_color).with_opacity(if emphasized {
            255
        } else {
            style.dim_alpha
        });
        draw_line(&mut out, font, px, line, x, top, &paint);

        if emphasized {
            let bar_w = (unit * 0.12).round().max(2.0) as u32;
            let bar_h = (line_h * 0.8).round().max(2.0) as u32;
            let bar_x = (x - (unit * 0.5) as i64 - bar_w as i64).max(0);
            let bar_y = (line_center - bar_h as f32 / 2.0).round() as i64;
            let bar = rounded_rect_mask(bar_w, bar_h, bar_w / 2);
            blend_mask(&mut out, &bar, bar_x, bar_y, style.accent, 255);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{load_face, locate_common_bold_font};
    use image::Rgba;

    #[test]
    fn test_anchored_band_profile() {
        let policy = OverlayPolicy::AnchoredBand {
            start: 0.3,
            end: 0.5,
            peak_alpha: 200,
        };
        assert_eq!(policy.alpha_at(0, 100), 200);
        assert_eq!(policy.alpha_at(30, 100), 200);
        assert_eq!(policy.alpha_at(40, 100), 100);
        assert_eq!(policy.alpha_at(50, 100), 0);
        assert_eq!(policy.alpha_at(99, 100), 0);
        assert_eq!(policy.text_center(), 0.15);
    }

    #[test]
    fn test_gaussian_profile_peaks_at_center() {
        let policy = OverlayPolicy::CenteredGaussian {
            center: 0.5,
            sigma: 0.1,
            peak_alpha: 180,
        };
        assert_eq!(policy.alpha_at(50, 100), 180);
        let near = policy.alpha_at(60, 100);
        let far = policy.alpha_at(90, 100);
        assert!(near < 180 && near > far);
        assert_eq!(policy.alpha_at(40, 100), near);
    }

    #[test]
    fn test_policy_serde_tagged() {
        let json = serde_json::to_string(&OverlayPolicy::centered()).unwrap();
        assert!(json.contains("\"kind\":\"centered_gaussian\""));
    }

    #[test]
    fn test_overlay_darkens_and_keeps_size() {
        let Some(font) = locate_common_bold_font().and_then(|p| load_face(&p, 0).ok()) else {
            return;
        };
        let screen = RgbaImage::from_pixel(360, 780, Rgba([200, 200, 200, 255]));
        let lines = [
            "Hi everyone, welcome back.".to_string(),
            "Today I'm sharing three tips".to_string(),
            "for recording better videos.".to_string(),
        ];
        let style = TeleprompterStyle::default().with_accent(Color::rgb(255, 0, 0));
        let out = apply_teleprompter(&screen, &lines, &font, &style);

        assert_eq!(out.dimensions(), screen.dimensions());
        // Top corner lies in the dark band, bottom is untouched.
        assert!(out.get_pixel(0, 0)[0] < 200);
        assert_eq!(out.get_pixel(0, 779), &Rgba([200, 200, 200, 255]));
        // Accent bar present.
        assert!(out.pixels().any(|p| p[0] == 255 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn test_centered_overlay_darkens_around_center() {
        let Some(font) = locate_common_bold_font().and_then(|p| load_face(&p, 0).ok()) else {
            return;
        };
        let screen = RgbaImage::from_pixel(360, 780, Rgba([200, 200, 200, 255]));
        let lines = [
            "Hi everyone, welcome back.".to_string(),
            "Today I'm sharing three tips".to_string(),
            "for recording better videos.".to_string(),
        ];
        let style = TeleprompterStyle::default().with_policy(OverlayPolicy::centered());
        let out = apply_teleprompter(&screen, &lines, &font, &style);

        assert_eq!(out.dimensions(), screen.dimensions());
        // Darkest at the center row, lighter at the top, clear at the bottom.
        let center = out.get_pixel(0, (780.0 * 0.22) as u32)[0];
        let top = out.get_pixel(0, 0)[0];
        assert!(center < top, "center {center} top {top}");
        assert!(top < 200);
        assert_eq!(out.get_pixel(0, 779), &Rgba([200, 200, 200, 255]));
        // Text sits around the center row rather than in the top band.
        let row_has_white =
            |y: u32| (0..360).any(|x| out.get_pixel(x, y) == &Rgba([255, 255, 255, 255]));
        assert!((150..200).any(row_has_white));
    }
}
