//! In-app event videos: short cover-cropped clips joined by stream copy.

use std::path::{Path, PathBuf};

use serde::Serialize;
use storefront_catalog::{CanvasSize, EventVideoTarget};
use storefront_common::{EventVideoConfig, StorefrontError, StorefrontResult};

use crate::command::FfmpegCommand;
use crate::concat::{concatenate, ConcatMode};
use crate::preview::cover_filter;

/// A finished event video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventVideoOutcome {
    pub name: String,
    pub output: PathBuf,
    pub clips: usize,
}

/// ffmpeg invocation for one silent, trimmed event clip.
pub fn event_clip_command(
    input: &Path,
    output: &Path,
    size: CanvasSize,
    settings: &EventVideoConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(input)
        .duration(settings.clip_duration_secs)
        .video_filter(cover_filter(size))
        .no_audio()
        .video_codec("libx264")
        .crf(settings.crf)
        .preset(&settings.preset)
        .pixel_format("yuv420p")
        .constant_frame_rate(settings.fps)
}

/// Build one event video. Every clip must exist.
pub fn build_event_video(
    ffmpeg: &str,
    target: &EventVideoTarget,
    clip_order: &[String],
    settings: &EventVideoConfig,
) -> StorefrontResult<EventVideoOutcome> {
    let inputs: Vec<PathBuf> = clip_order.iter().map(|c| target.input_path(c)).collect();
    if let Some(missing) = inputs.iter().find(|p| !p.is_file()) {
        return Err(StorefrontError::FileNotFound {
            path: missing.clone(),
        });
    }
    if inputs.is_empty() {
        return Err(StorefrontError::media(format!(
            "event video {} has no clips",
            target.name
        )));
    }

    let size = target.size();
    tracing::info!(
        name = %target.name,
        orientation = ?size.orientation(),
        output = %target.output.display(),
        "Building event video"
    );

    if let Some(parent) = target.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let scratch = tempfile::Builder::new()
        .prefix("storefront-event-")
        .tempdir()?;
    let mut clips = Vec::with_capacity(inputs.len());
    for (clip, input) in clip_order.iter().zip(&inputs) {
        let path = scratch.path().join(format!("{clip}.mp4"));
        tracing::info!(input = %input.display(), "Processing event clip");
        event_clip_command(input, &path, size, settings).run(ffmpeg)?;
        clips.push(path);
    }

    concatenate(ffmpeg, &clips, &target.output, ConcatMode::StreamCopy)?;

    Ok(EventVideoOutcome {
        name: target.name.clone(),
        output: target.output.clone(),
        clips: clips.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_clip_command() {
        let args = event_clip_command(
            Path::new("Landscape/woman_1.mp4"),
            Path::new("tmp/woman_1.mp4"),
            CanvasSize::new(1920, 1080),
            &EventVideoConfig::default(),
        )
        .build_args()
        .join(" ");

        assert!(args.contains(
            "-i Landscape/woman_1.mp4 -t 3 \
             -vf scale=1920:1080:force_original_aspect_ratio=increase,crop=1920:1080 -an"
        ));
        assert!(args.contains("-c:v libx264 -crf 18 -preset fast -pix_fmt yuv420p -r 30 -vsync cfr"));
        assert!(args.ends_with("tmp/woman_1.mp4"));
    }

    #[test]
    fn test_missing_clip_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let target = EventVideoTarget {
            name: "card".to_string(),
            source_dir: dir.path().to_path_buf(),
            width: 1920,
            height: 1080,
            output: dir.path().join("event_card.mp4"),
        };
        let err = build_event_video(
            "ffmpeg",
            &target,
            &["woman_1".to_string()],
            &EventVideoConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_missing_input());
        assert!(!target.output.exists());
    }
}
