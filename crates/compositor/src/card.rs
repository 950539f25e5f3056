//! Marketing card composition.
//!
//! A card is planned first (font sizes, text blocks, phone geometry) and
//! then drawn. Planning is cheap and pure, which keeps the layout arithmetic
//! testable without comparing pixels.

use ab_glyph::FontArc;
use image::imageops;
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use storefront_catalog::{CanvasSize, Clip, Color, CopyRecord, Orientation};
use storefront_common::{StorefrontError, StorefrontResult};

use crate::fonts::FontRegistry;
use crate::gradient::render_gradient;
use crate::mockup::{build_phone_mockup, MockupSpec, PHONE_ASPECT};
use crate::raster::{blend_mask, rounded_rect_mask, scale_to_width, solid};
use crate::shadow::{composite_with_shadow, ShadowStyle};
use crate::teleprompter::{apply_teleprompter, OverlayPolicy, TeleprompterStyle};
use crate::text::{draw_block_centered, fit_size, layout_block, line_height, BlockLayout, TextPaint};

const NAVY: Color = Color::rgb(13, 27, 42);
const SCREEN_FILL: Color = Color::BLACK;
const PILL_ALPHA: u8 = 96;
const MIN_PHONE_WIDTH: u32 = 16;

/// How headline and subtitle are made legible over the background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    /// Each headline line sits on its own opaque navy block; subtitle is
    /// plain navy text.
    #[default]
    LabelBlockTop,
    /// Headline and subtitle each sit on one translucent dark pill.
    PillBackground,
    /// White text with a navy outline, no backgrounds.
    PlainStroke,
}

impl std::str::FromStr for LayoutPolicy {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label-block-top" | "label_block_top" => Ok(Self::LabelBlockTop),
            "pill-background" | "pill_background" => Ok(Self::PillBackground),
            "plain-stroke" | "plain_stroke" => Ok(Self::PlainStroke),
            other => Err(StorefrontError::config(format!(
                "unknown layout policy: {other}"
            ))),
        }
    }
}

/// Layout constants. Ratios are fractions of canvas height unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub policy: LayoutPolicy,
    pub overlay: OverlayPolicy,

    pub headline_ratio: f32,
    pub subtitle_ratio: f32,
    /// Smallest auto-fit size, as a fraction of the nominal size.
    pub min_subtitle_ratio: f32,
    pub text_top_ratio: f32,
    pub text_gap_ratio: f32,
    /// Fraction of the text zone width text may occupy.
    pub max_text_width_ratio: f32,

    /// Portrait phone width as a fraction of canvas width.
    pub phone_width_ratio: f32,
    pub phone_gap_ratio: f32,
    /// How far the phone may run past the bottom edge.
    pub bleed_ratio: f32,

    /// Fraction of canvas width reserved for text in landscape.
    pub landscape_text_zone: f32,
    pub landscape_headline_ratio: f32,
    pub landscape_subtitle_ratio: f32,
    pub landscape_text_gap_ratio: f32,
    pub landscape_phone_height_ratio: f32,

    pub social_proof_ratio: f32,
    pub social_proof_margin_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            policy: LayoutPolicy::default(),
            overlay: OverlayPolicy::default(),
            headline_ratio: 0.034,
            subtitle_ratio: 0.019,
            min_subtitle_ratio: 0.6,
            text_top_ratio: 0.055,
            text_gap_ratio: 0.012,
            max_text_width_ratio: 0.90,
            phone_width_ratio: 0.78,
            phone_gap_ratio: 0.025,
            bleed_ratio: 0.08,
            landscape_text_zone: 0.42,
            landscape_headline_ratio: 0.07,
            landscape_subtitle_ratio: 0.038,
            landscape_text_gap_ratio: 0.03,
            landscape_phone_height_ratio: 0.88,
            social_proof_ratio: 0.016,
            social_proof_margin_ratio: 0.035,
        }
    }
}

impl LayoutConfig {
    pub fn with_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Everything needed to draw one card.
#[derive(Debug, Clone, Copy)]
pub struct CardRequest<'a> {
    /// Still frame captured from the clip.
    pub frame: &'a RgbaImage,
    pub size: CanvasSize,
    pub clip: &'a Clip,
    pub language: &'a str,
    pub copy: &'a CopyRecord,
    /// Locale whose teleprompter lines are used when `language` has none.
    pub fallback_language: &'a str,
}

/// Background treatment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// One opaque block per line.
    LabelPerLine { color: Color },
    /// One translucent pill around the whole block.
    Pill { color: Color, alpha: u8 },
    Plain,
}

/// A laid-out text block at its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub layout: BlockLayout,
    pub decoration: Decoration,
    pub paint: TextPaint,
    pub pad_x: i64,
    pub pad_y: i64,
    /// Top of the decorated extent.
    pub top: i64,
}

impl PlacedBlock {
    pub fn outer_height(&self) -> i64 {
        self.layout.height as i64 + 2 * self.pad_y
    }

    pub fn bottom(&self) -> i64 {
        self.top + self.outer_height()
    }

    /// Widest rendered text line.
    pub fn text_width(&self) -> u32 {
        self.layout.width
    }
}

/// Resolved geometry of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPlan {
    pub size: CanvasSize,
    pub orientation: Orientation,
    pub text_center_x: i64,
    pub text_max_width: u32,
    pub headline: PlacedBlock,
    pub subtitle: PlacedBlock,
    pub social_proof: Option<PlacedBlock>,
    pub mockup: MockupSpec,
    pub phone_origin: (i64, i64),
    pub shadow: ShadowStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Headline,
    Subtitle,
    SocialProof,
}

/// Builds marketing cards from frames, copy and a layout.
pub struct CardCompositor<'a> {
    fonts: &'a FontRegistry,
    layout: LayoutConfig,
}

impl<'a> CardCompositor<'a> {
    pub fn new(fonts: &'a FontRegistry, layout: LayoutConfig) -> Self {
        Self { fonts, layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Compose an opaque card of exactly `request.size`.
    pub fn compose(&self, request: &CardRequest<'_>) -> StorefrontResult<RgbImage> {
        let font = self.fonts.font_for(request.language)?;
        let plan = self.plan_with_font(request, &font)?;
        let size = plan.size;

        let gradient = &request.clip.gradient;
        let background = render_gradient(size.width, size.height, gradient.top, gradient.bottom);
        let mut canvas = DynamicImage::ImageRgb8(background).into_rgba8();

        draw_placed(&mut canvas, &font, &plan.headline, plan.text_center_x);
        draw_placed(&mut canvas, &font, &plan.subtitle, plan.text_center_x);

        let screen = self.build_screen(request, &plan.mockup, &font);
        let phone = build_phone_mockup(&screen, &plan.mockup);
        let mut canvas = composite_with_shadow(&canvas, &phone, plan.phone_origin, &plan.shadow);

        if let Some(proof) = &plan.social_proof {
            draw_placed(&mut canvas, &font, proof, size.width as i64 / 2);
        }

        tracing::debug!(
            clip = %request.clip.id,
            language = request.language,
            size = %size,
            policy = ?self.layout.policy,
            headline_px = plan.headline.layout.px,
            subtitle_px = plan.subtitle.layout.px,
            phone_width = plan.mockup.phone_width,
            "Card composed"
        );

        Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }

    /// Resolve the card geometry without drawing.
    pub fn plan(&self, request: &CardRequest<'_>) -> StorefrontResult<CardPlan> {
        let font = self.fonts.font_for(request.language)?;
        self.plan_with_font(request, &font)
    }

    fn plan_with_font(
        &self,
        request: &CardRequest<'_>,
        font: &FontArc,
    ) -> StorefrontResult<CardPlan> {
        let size = request.size;
        if size.is_empty() {
            return Err(StorefrontError::render(format!(
                "cannot compose a {size} card"
            )));
        }
        match size.orientation() {
            Orientation::Portrait => self.plan_portrait(request, font),
            Orientation::Landscape => self.plan_landscape(request, font),
        }
    }

    fn plan_portrait(&self, request: &CardRequest<'_>, font: &FontArc) -> StorefrontResult<CardPlan> {
        let l = &self.layout;
        let size = request.size;
        let (w, h) = (size.width as f32, size.height as f32);
        let max_width = (w * l.max_text_width_ratio) as u32;

        let mut headline = self.place_block(
            font,
            &request.copy.headline,
            h * l.headline_ratio,
            max_width,
            Role::Headline,
        );
        headline.top = (h * l.text_top_ratio).round() as i64;

        let mut subtitle = self.place_block(
            font,
            &request.copy.subtitle,
            h * l.subtitle_ratio,
            max_width,
            Role::Subtitle,
        );
        subtitle.top = headline.bottom() + (h * l.text_gap_ratio).round() as i64;

        let phone_top = subtitle.bottom() + (h * l.phone_gap_ratio).round() as i64;
        let bleed = h * l.bleed_ratio;
        let by_width = w * l.phone_width_ratio;
        let by_height = (h - phone_top as f32 + bleed) / PHONE_ASPECT as f32;
        // On very small canvases the phone keeps a minimum size and bleeds.
        let phone_width = by_width.min(by_height).floor().max(MIN_PHONE_WIDTH as f32);

        let mockup = MockupSpec::for_width(phone_width as u32, request.clip.gradient.top);
        let (outer_w, _) = mockup.outer_size();
        let phone_origin = ((size.width as i64 - outer_w as i64) / 2, phone_top);

        let social_proof = request.copy.social_proof.as_deref().map(|text| {
            let mut block =
                self.place_block(font, text, h * l.social_proof_ratio, max_width, Role::SocialProof);
            block.top = (h - h * l.social_proof_margin_ratio).round() as i64 - block.outer_height();
            block
        });

        Ok(CardPlan {
            size,
            orientation: Orientation::Portrait,
            text_center_x: size.width as i64 / 2,
            text_max_width: max_width,
            headline,
            subtitle,
            social_proof,
            mockup,
            phone_origin,
            shadow: ShadowStyle::for_canvas(size),
        })
    }

    fn plan_landscape(&self, request: &CardRequest<'_>, font: &FontArc) -> StorefrontResult<CardPlan> {
        let l = &self.layout;
        let size = request.size;
        let (w, h) = (size.width as f32, size.height as f32);
        let zone_w = w * l.landscape_text_zone;
        let max_width = (zone_w * l.max_text_width_ratio) as u32;

        let mut headline = self.place_block(
            font,
            &request.copy.headline,
            h * l.landscape_headline_ratio,
            max_width,
            Role::Headline,
        );
        let mut subtitle = self.place_block(
            font,
            &request.copy.subtitle,
            h * l.landscape_subtitle_ratio,
            max_width,
            Role::Subtitle,
        );
        let gap = (h * l.landscape_text_gap_ratio).round() as i64;
        let total = headline.outer_height() + gap + subtitle.outer_height();
        headline.top = (size.height as i64 - total) / 2;
        subtitle.top = headline.bottom() + gap;

        let right_w = w - zone_w;
        let by_height = h * l.landscape_phone_height_ratio / PHONE_ASPECT as f32;
        let by_zone = right_w * 0.9;
        let phone_width = by_height.min(by_zone).floor().max(MIN_PHONE_WIDTH as f32);

        let mockup = MockupSpec::for_width(phone_width as u32, request.clip.gradient.top);
        let (outer_w, outer_h) = mockup.outer_size();
        let phone_origin = (
            zone_w as i64 + (right_w as i64 - outer_w as i64) / 2,
            (size.height as i64 - outer_h as i64) / 2,
        );

        Ok(CardPlan {
            size,
            orientation: Orientation::Landscape,
            text_center_x: (zone_w / 2.0).round() as i64,
            text_max_width: max_width,
            headline,
            subtitle,
            social_proof: None,
            mockup,
            phone_origin,
            shadow: ShadowStyle::for_canvas(size),
        })
    }

    /// Fit, lay out and decorate one block; `top` is set by the caller.
    fn place_block(
        &self,
        font: &FontArc,
        text: &str,
        nominal: f32,
        max_width: u32,
        role: Role,
    ) -> PlacedBlock {
        let min_px = nominal * self.layout.min_subtitle_ratio;
        let px = fit_size(font, text, nominal, min_px, max_width);
        let lh = line_height(font, px).max(1.0);

        let (decoration, paint, pad_x, pad_y, spacing) = match (self.layout.policy, role) {
            (_, Role::SocialProof) | (LayoutPolicy::PillBackground, _) => (
                Decoration::Pill {
                    color: Color::BLACK,
                    alpha: PILL_ALPHA,
                },
                TextPaint::solid(Color::WHITE),
                px * 0.6,
                px * 0.35,
                0.15,
            ),
            (LayoutPolicy::LabelBlockTop, Role::Headline) => {
                let pad_y = px * 0.18;
                let gap = px * 0.12;
                (
                    Decoration::LabelPerLine { color: NAVY },
                    TextPaint::solid(Color::WHITE),
                    px * 0.35,
                    pad_y,
                    (2.0 * pad_y + gap) / lh,
                )
            }
            (LayoutPolicy::LabelBlockTop, _) => (
                Decoration::Plain,
                TextPaint::solid(NAVY),
                0.0,
                0.0,
                0.15,
            ),
            (LayoutPolicy::PlainStroke, _) => {
                let ratio = if role == Role::Headline { 0.14 } else { 0.12 };
                let min = if role == Role::Headline { 3.0 } else { 2.0 };
                let stroke = (px * ratio).max(min).min(u8::MAX as f32) as u8;
                (
                    Decoration::Plain,
                    TextPaint::solid(Color::WHITE).with_stroke(NAVY, stroke),
                    stroke as f32,
                    stroke as f32,
                    0.15,
                )
            }
        };

        PlacedBlock {
            layout: layout_block(font, px, text, spacing),
            decoration,
            paint,
            pad_x: pad_x.round() as i64,
            pad_y: pad_y.round() as i64,
            top: 0,
        }
    }

    /// Frame scaled to the screen width on a solid fill, plus teleprompter.
    fn build_screen(
        &self,
        request: &CardRequest<'_>,
        mockup: &MockupSpec,
        font: &FontArc,
    ) -> RgbaImage {
        let (screen_w, screen_h) = mockup.screen_size();
        let scaled = scale_to_width(request.frame, screen_w);

        let mut screen = solid(screen_w, screen_h, SCREEN_FILL);
        let y = (screen_h as i64 - scaled.height() as i64) / 2;
        imageops::overlay(&mut screen, &scaled, 0, y);

        match request
            .clip
            .teleprompter_for(request.language, request.fallback_language)
        {
            Some(lines) => {
                let style = TeleprompterStyle::default()
                    .with_policy(self.layout.overlay)
                    .with_accent(request.clip.gradient.top);
                apply_teleprompter(&screen, lines, font, &style)
            }
            None => screen,
        }
    }
}

fn draw_placed(canvas: &mut RgbaImage, font: &FontArc, block: &PlacedBlock, center_x: i64) {
    let text_top = block.top + block.pad_y;
    let px = block.layout.px;

    match block.decoration {
        Decoration::LabelPerLine { color } => {
            let radius = (px * 0.22).round() as u32;
            for line in &block.layout.lines {
                let w = line.width + 2 * block.pad_x as u32;
                let h = line.height + 2 * block.pad_y as u32;
                let mask = rounded_rect_mask(w, h, radius);
                let x = center_x - line.width as i64 / 2 - block.pad_x;
                let y = text_top + line.offset_y - block.pad_y;
                blend_mask(canvas, &mask, x, y, color, 255);
            }
        }
        Decoration::Pill { color, alpha } => {
            let w = block.layout.width + 2 * block.pad_x as u32;
            let h = block.outer_height().max(0) as u32;
            let radius = ((px * 0.6).round() as u32).min(h / 2);
            let mask = rounded_rect_mask(w, h, radius);
            let x = center_x - block.layout.width as i64 / 2 - block.pad_x;
            blend_mask(canvas, &mask, x, block.top, color, alpha);
        }
        Decoration::Plain => {}
    }

    draw_block_centered(canvas, font, &block.layout, center_x, text_top, &block.paint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_policy_parsing() {
        assert_eq!(
            "label-block-top".parse::<LayoutPolicy>().unwrap(),
            LayoutPolicy::LabelBlockTop
        );
        assert_eq!(
            "pill_background".parse::<LayoutPolicy>().unwrap(),
            LayoutPolicy::PillBackground
        );
        assert_eq!(
            "plain-stroke".parse::<LayoutPolicy>().unwrap(),
            LayoutPolicy::PlainStroke
        );
        assert!("neon".parse::<LayoutPolicy>().is_err());
    }

    #[test]
    fn test_layout_config_partial_json() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"policy":"plain_stroke","bleed_ratio":0.1}"#).unwrap();
        assert_eq!(config.policy, LayoutPolicy::PlainStroke);
        assert_eq!(config.bleed_ratio, 0.1);
        assert_eq!(config.headline_ratio, LayoutConfig::default().headline_ratio);
    }
}
