//! Render screenshot cards.

use std::path::{Path, PathBuf};

use anyhow::Context;
use storefront_common::AppConfig;
use storefront_compositor::{FontRegistry, LayoutConfig, LayoutPolicy, OverlayPolicy};
use storefront_media::FfmpegFrameSource;
use storefront_pipeline::{BatchDriver, BatchOptions, Selection};

use super::{filter, load_catalog};

pub struct CardArgs {
    pub output: Option<PathBuf>,
    pub clips_dir: Option<PathBuf>,
    pub layout: String,
    pub overlay: String,
    pub devices: Vec<String>,
    pub languages: Vec<String>,
    pub clips: Vec<String>,
}

fn parse_overlay(name: &str) -> anyhow::Result<OverlayPolicy> {
    match name {
        "anchored-band" | "anchored_band" => Ok(OverlayPolicy::default()),
        "centered" | "centered-gaussian" | "centered_gaussian" => Ok(OverlayPolicy::centered()),
        other => Err(anyhow::anyhow!(
            "Unknown overlay: {other}. Use: anchored-band, centered"
        )),
    }
}

pub fn run(config: &AppConfig, catalog_path: Option<&Path>, args: CardArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let policy: LayoutPolicy = args.layout.parse()?;
    let layout = LayoutConfig {
        overlay: parse_overlay(&args.overlay)?,
        ..LayoutConfig::default().with_policy(policy)
    };

    let mut fonts = FontRegistry::from_config(&config.fonts).context("Failed to load fonts")?;
    fonts.apply_language_overrides(&catalog.languages);

    let options = BatchOptions {
        output_root: args.output.unwrap_or_else(|| config.output_root.clone()),
        clips_dir: args.clips_dir.unwrap_or_else(|| config.clips_dir.clone()),
        layout,
        selection: Selection {
            devices: filter(args.devices),
            languages: filter(args.languages),
            clips: filter(args.clips),
        },
    };

    println!("Rendering cards into: {}", options.output_root.display());
    println!("  Layout: {policy:?}");
    println!("  Clips: {}", options.clips_dir.display());

    let frames = FfmpegFrameSource::new(config.tools.ffmpeg.clone());
    let report = BatchDriver::new(&catalog, &fonts, &frames, options).run()?;

    println!();
    for (device, languages) in &report.cards {
        let total: usize = languages.values().sum();
        println!("  {device}: {total} card(s) in {} language(s)", languages.len());
    }
    for skipped in &report.skipped {
        println!("  Skipped {}: {}", skipped.clip, skipped.reason);
    }
    println!("Report: {}", report.path().display());

    if report.total_cards() == 0 {
        anyhow::bail!("No cards were generated");
    }
    println!("\n{} card(s) generated.", report.total_cards());
    Ok(())
}
