use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use proptest::prelude::*;
use proptest::test_runner::TestRunner;
use storefront_catalog::{CanvasSize, Clip, CopyRecord, GradientPair, Orientation};
use storefront_compositor::fonts::{load_face, locate_common_bold_font};
use storefront_compositor::{
    CardCompositor, CardRequest, FontRegistry, LayoutConfig, LayoutPolicy, OverlayPolicy,
};

fn registry() -> Option<FontRegistry> {
    let path = locate_common_bold_font()?;
    let face = load_face(&path, 0).ok()?;
    Some(FontRegistry::with_default_face(face))
}

/// A 1080x1920 frame: flat teal with a bright disc, easy to spot after scaling.
fn synthetic_frame() -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(1080, 1920, Rgba([30, 140, 130, 255]));
    draw_filled_circle_mut(&mut frame, (540, 1400), 300, Rgba([250, 240, 20, 255]));
    frame
}

fn alpha_clip() -> Clip {
    let mut clip = Clip::new(
        "alpha",
        "alpha.mp4",
        GradientPair::new((255, 107, 107), (255, 160, 137)),
    );
    clip.teleprompter.insert(
        "en-US".to_string(),
        [
            "Hi everyone, welcome back.".to_string(),
            "Today I'm sharing three tips".to_string(),
            "for recording better videos.".to_string(),
        ],
    );
    clip
}

fn alpha_copy() -> CopyRecord {
    CopyRecord::new("Nail Every Take", "Professional teleprompter at your fingertips")
}

#[test]
fn alpha_portrait_card_end_to_end() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let compositor = CardCompositor::new(&fonts, LayoutConfig::default());
    let request = CardRequest {
        frame: &frame,
        size: CanvasSize::new(1284, 2778),
        clip: &clip,
        language: "en-US",
        copy: &copy,
        fallback_language: "en-US",
    };

    let plan = compositor.plan(&request).unwrap();
    assert_eq!(plan.orientation, Orientation::Portrait);
    // Headline near the top.
    assert!(plan.headline.top < (2778.0 * 0.15) as i64);
    // Phone below the text, horizontally centered.
    assert!(plan.phone_origin.1 > plan.subtitle.bottom());
    let (outer_w, _) = plan.mockup.outer_size();
    let left = plan.phone_origin.0;
    let right = 1284 - (left + outer_w as i64);
    assert!((left - right).abs() <= 1);

    let card = compositor.compose(&request).unwrap();
    assert_eq!(card.dimensions(), (1284, 2778));

    // Top-left corner is the gradient's top color.
    assert_eq!(card.get_pixel(0, 0).0, [255, 107, 107]);

    // Headline label block (navy) appears in the top band.
    let navy_in_top = (0..(2778 / 6))
        .flat_map(|y| (0..1284).map(move |x| (x, y)))
        .any(|(x, y)| card.get_pixel(x, y).0 == [13, 27, 42]);
    assert!(navy_in_top);

    // The disc from the frame shows through the phone screen.
    let yellowish = card
        .pixels()
        .filter(|p| p[0] > 200 && p[1] > 200 && p[2] < 80)
        .count();
    assert!(yellowish > 1000);
}

#[test]
fn subtitle_fits_within_ninety_percent() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let compositor = CardCompositor::new(&fonts, LayoutConfig::default());

    for size in [CanvasSize::new(1284, 2778), CanvasSize::new(1242, 2688)] {
        let request = CardRequest {
            frame: &frame,
            size,
            clip: &clip,
            language: "en-US",
            copy: &copy,
            fallback_language: "en-US",
        };
        let plan = compositor.plan(&request).unwrap();
        let limit = (size.width as f32 * 0.90) as u32;
        assert!(plan.subtitle.text_width() <= limit + 1);
        assert!(plan.headline.text_width() <= limit + 1);
    }
}

#[test]
fn long_subtitle_is_shrunk_to_fit_on_the_card() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let layout = LayoutConfig::default();
    let compositor = CardCompositor::new(&fonts, layout);
    let size = CanvasSize::new(1284, 2778);
    let nominal = size.height as f32 * layout.subtitle_ratio;
    let floor = nominal * layout.min_subtitle_ratio;
    let limit = (size.width as f32 * layout.max_text_width_ratio) as u32;

    let copy = CopyRecord::new(
        "Acerte Cada Tomada",
        "Teleprompter profissional na ponta dos seus dedos",
    );
    let request = CardRequest {
        frame: &frame,
        size,
        clip: &clip,
        language: "pt-BR",
        copy: &copy,
        fallback_language: "en-US",
    };
    let plan = compositor.plan(&request).unwrap();
    assert!(plan.subtitle.layout.px < nominal, "px {}", plan.subtitle.layout.px);
    assert!(plan.subtitle.layout.px >= floor);
    assert!(plan.subtitle.text_width() <= limit + 1);

    // A subtitle that cannot fit stops at the floor instead of vanishing.
    let endless = "muito ".repeat(60);
    let copy = CopyRecord::new("Acerte Cada Tomada", endless.trim_end());
    let request = CardRequest {
        copy: &copy,
        ..request
    };
    let plan = compositor.plan(&request).unwrap();
    assert!((plan.subtitle.layout.px - floor).abs() < 0.01);
    assert!(plan.subtitle.text_width() > limit);
    assert_eq!(compositor.compose(&request).unwrap().dimensions(), (1284, 2778));
}

#[test]
fn tiny_canvases_still_produce_exact_cards() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();

    for policy in [
        LayoutPolicy::LabelBlockTop,
        LayoutPolicy::PillBackground,
        LayoutPolicy::PlainStroke,
    ] {
        let compositor = CardCompositor::new(&fonts, LayoutConfig::default().with_policy(policy));
        for (w, h) in [(1, 2), (20, 40), (10, 2000), (100, 101), (40, 20), (2, 1)] {
            let request = CardRequest {
                frame: &frame,
                size: CanvasSize::new(w, h),
                clip: &clip,
                language: "en-US",
                copy: &copy,
                fallback_language: "en-US",
            };
            let card = compositor.compose(&request).unwrap();
            assert_eq!(card.dimensions(), (w, h), "{policy:?} {w}x{h}");
        }
    }
}

#[test]
fn small_portrait_canvases_keep_their_size() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let compositors = [
        LayoutPolicy::LabelBlockTop,
        LayoutPolicy::PillBackground,
        LayoutPolicy::PlainStroke,
    ]
    .map(|policy| CardCompositor::new(&fonts, LayoutConfig::default().with_policy(policy)));

    let mut runner = TestRunner::new(ProptestConfig::with_cases(32));
    runner
        .run(&(1u32..80, 1u32..240, 0usize..3), |(w, extra, policy)| {
            let size = CanvasSize::new(w, w + extra);
            let request = CardRequest {
                frame: &frame,
                size,
                clip: &clip,
                language: "en-US",
                copy: &copy,
                fallback_language: "en-US",
            };
            let card = compositors[policy]
                .compose(&request)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(card.dimensions(), (size.width, size.height));
            Ok(())
        })
        .unwrap();
}

#[test]
fn centered_overlay_changes_the_screen_only() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let size = CanvasSize::new(642, 1389);
    let request = CardRequest {
        frame: &frame,
        size,
        clip: &clip,
        language: "en-US",
        copy: &copy,
        fallback_language: "en-US",
    };

    let anchored = CardCompositor::new(&fonts, LayoutConfig::default());
    let centered = CardCompositor::new(
        &fonts,
        LayoutConfig {
            overlay: OverlayPolicy::centered(),
            ..LayoutConfig::default()
        },
    );

    let plan = centered.plan(&request).unwrap();
    assert_eq!(plan, anchored.plan(&request).unwrap());

    let a = anchored.compose(&request).unwrap();
    let c = centered.compose(&request).unwrap();
    assert_eq!(c.dimensions(), (642, 1389));
    assert_ne!(a.as_raw(), c.as_raw());
    // Text area above the phone is identical.
    let text_bottom = plan.subtitle.bottom() as u32;
    for y in 0..text_bottom {
        for x in 0..642 {
            assert_eq!(a.get_pixel(x, y), c.get_pixel(x, y));
        }
    }
}

#[test]
fn composition_is_deterministic() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let compositor = CardCompositor::new(&fonts, LayoutConfig::default());
    let request = CardRequest {
        frame: &frame,
        size: CanvasSize::new(642, 1389),
        clip: &clip,
        language: "en-US",
        copy: &copy,
        fallback_language: "en-US",
    };

    let first = compositor.compose(&request).unwrap();
    let second = compositor.compose(&request).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn every_policy_produces_exact_size_in_both_orientations() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let mut copy = CopyRecord::new("Speak With\nConfidence", "Read your script\nnaturally on camera");
    copy.social_proof = Some("Loved by creators everywhere".to_string());

    for policy in [
        LayoutPolicy::LabelBlockTop,
        LayoutPolicy::PillBackground,
        LayoutPolicy::PlainStroke,
    ] {
        let compositor = CardCompositor::new(&fonts, LayoutConfig::default().with_policy(policy));
        for size in [CanvasSize::new(621, 1344), CanvasSize::new(1344, 621)] {
            let request = CardRequest {
                frame: &frame,
                size,
                clip: &clip,
                language: "de",
                copy: &copy,
                fallback_language: "en-US",
            };
            let card = compositor.compose(&request).unwrap();
            assert_eq!(card.dimensions(), (size.width, size.height), "{policy:?} {size}");
        }
    }
}

#[test]
fn landscape_places_phone_in_right_zone() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let compositor = CardCompositor::new(&fonts, LayoutConfig::default());
    let request = CardRequest {
        frame: &frame,
        size: CanvasSize::new(2778, 1284),
        clip: &clip,
        language: "en-US",
        copy: &copy,
        fallback_language: "en-US",
    };

    let plan = compositor.plan(&request).unwrap();
    assert_eq!(plan.orientation, Orientation::Landscape);
    assert!(plan.social_proof.is_none());
    assert!(plan.phone_origin.0 >= (2778.0 * 0.42) as i64);
    assert!(plan.text_center_x < (2778.0 * 0.42) as i64);
    let (_, outer_h) = plan.mockup.outer_size();
    assert!(plan.phone_origin.1 >= 0);
    assert!(plan.phone_origin.1 + outer_h as i64 <= 1284);
}

#[test]
fn zero_canvas_is_rejected() {
    let Some(fonts) = registry() else { return };
    let frame = synthetic_frame();
    let clip = alpha_clip();
    let copy = alpha_copy();
    let compositor = CardCompositor::new(&fonts, LayoutConfig::default());
    let request = CardRequest {
        frame: &frame,
        size: CanvasSize::new(0, 100),
        clip: &clip,
        language: "en-US",
        copy: &copy,
        fallback_language: "en-US",
    };
    assert!(compositor.compose(&request).is_err());
}
