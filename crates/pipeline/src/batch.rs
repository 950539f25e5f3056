//! Card batch driver.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage, RgbaImage};
use storefront_catalog::{card_path, Catalog, Clip};
use storefront_common::{StorefrontError, StorefrontResult};
use storefront_compositor::{CardCompositor, CardRequest, FontRegistry, LayoutConfig};
use storefront_media::FrameSource;

use crate::report::{RunReport, SkippedClip};

/// Optional filters; `None` selects everything in the catalog.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub devices: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub clips: Option<Vec<String>>,
}

impl Selection {
    fn allows(filter: &Option<Vec<String>>, value: &str) -> bool {
        filter
            .as_ref()
            .map_or(true, |items| items.iter().any(|item| item == value))
    }
}

/// Settings for one card batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_root: PathBuf,
    pub clips_dir: PathBuf,
    pub layout: LayoutConfig,
    pub selection: Selection,
}

/// Generates every selected card.
pub struct BatchDriver<'a> {
    catalog: &'a Catalog,
    fonts: &'a FontRegistry,
    frames: &'a dyn FrameSource,
    options: BatchOptions,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        fonts: &'a FontRegistry,
        frames: &'a dyn FrameSource,
        options: BatchOptions,
    ) -> Self {
        Self {
            catalog,
            fonts,
            frames,
            options,
        }
    }

    /// Run the batch and write `report.json`.
    ///
    /// Clips whose source video is missing are skipped; any other failure
    /// aborts the run.
    pub fn run(&self) -> StorefrontResult<RunReport> {
        self.catalog.ensure_valid()?;
        let selection = &self.options.selection;
        let mut report = RunReport::new(&self.options.output_root, self.options.layout.policy);

        let frames = self.capture_frames(&mut report)?;
        let compositor = CardCompositor::new(self.fonts, self.options.layout);

        for device in self
            .catalog
            .devices
            .iter()
            .filter(|d| Selection::allows(&selection.devices, &d.name))
        {
            for language in self
                .catalog
                .languages
                .iter()
                .filter(|l| Selection::allows(&selection.languages, &l.code))
            {
                tracing::info!(device = %device.name, language = %language.code, "Generating cards");

                for (index, clip) in self.catalog.clips.iter().enumerate() {
                    let Some(frame) = frames.get(&clip.id) else {
                        continue;
                    };
                    let copy = language.record(index).ok_or_else(|| {
                        StorefrontError::catalog(format!(
                            "language {} has no copy for clip {}",
                            language.code, clip.id
                        ))
                    })?;

                    for size in &device.sizes {
                        let request = CardRequest {
                            frame,
                            size: *size,
                            clip,
                            language: &language.code,
                            copy,
                            fallback_language: &self.catalog.default_language,
                        };
                        let card = compositor.compose(&request)?;
                        let path = card_path(
                            &self.options.output_root,
                            &device.name,
                            &language.code,
                            &clip.id,
                            *size,
                        );
                        write_png(&card, &path)?;
                        report.record_card(&device.name, &language.code);
                        tracing::debug!(path = %path.display(), "Card written");
                    }
                }
            }
        }

        let report_path = report.save()?;
        tracing::info!(
            cards = report.total_cards(),
            skipped = report.skipped.len(),
            report = %report_path.display(),
            "Card batch complete"
        );
        Ok(report)
    }

    /// One frame per selected clip, captured exactly once.
    fn capture_frames(&self, report: &mut RunReport) -> StorefrontResult<BTreeMap<String, RgbaImage>> {
        let mut frames = BTreeMap::new();
        for clip in self.selected_clips() {
            let source = clip.source_path(&self.options.clips_dir);
            match self.frames.capture(&source, clip.frame_timestamp_secs) {
                Ok(frame) => {
                    frames.insert(clip.id.clone(), frame);
                }
                Err(e) if e.is_missing_input() => {
                    tracing::warn!(clip = %clip.id, source = %source.display(), "Skipping clip: {}", e);
                    report.skipped.push(SkippedClip {
                        clip: clip.id.clone(),
                        source,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(frames)
    }

    fn selected_clips(&self) -> impl Iterator<Item = &'a Clip> + '_ {
        let filter = &self.options.selection.clips;
        self.catalog
            .clips
            .iter()
            .filter(move |c| Selection::allows(filter, &c.id))
    }
}

/// Encode in memory, write beside the target, then rename into place so a
/// failed run never leaves a truncated PNG.
fn write_png(card: &RgbImage, path: &Path) -> StorefrontResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut bytes = std::io::Cursor::new(Vec::new());
    card.write_to(&mut bytes, ImageFormat::Png)?;

    let staging = path.with_extension("png.partial");
    std::fs::write(&staging, bytes.into_inner())?;
    std::fs::rename(&staging, path)?;
    Ok(())
}
