//! App Preview assembly: normalize clips to the App Store profile,
//! concatenate, and check the duration policy.

use std::path::{Path, PathBuf};

use serde::Serialize;
use storefront_catalog::{CanvasSize, PreviewTarget};
use storefront_common::{AppConfig, EncodingConfig, StorefrontResult};

use crate::command::FfmpegCommand;
use crate::concat::{concatenate, ConcatMode};
use crate::probe::{probe_duration, DurationStatus};

/// Scale to cover `size`, then center-crop to it exactly.
pub fn cover_filter(size: CanvasSize) -> String {
    let (w, h) = (size.width, size.height);
    format!("scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}")
}

/// Cover filter plus BT.709 conversion and 4:2:0 chroma.
pub fn normalize_filter(size: CanvasSize) -> String {
    format!("{},colorspace=all=bt709,format=yuv420p", cover_filter(size))
}

/// ffmpeg invocation that normalizes one clip.
///
/// The silent stereo track comes from `anullsrc`; `-shortest` stops at the
/// end of the video.
pub fn normalize_command(
    input: &Path,
    output: &Path,
    size: CanvasSize,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(input)
        .lavfi(format!(
            "anullsrc=channel_layout=stereo:sample_rate={}",
            encoding.audio_sample_rate
        ))
        .video_codec("libx264")
        .h264_profile(&encoding.h264_profile, &encoding.h264_level)
        .video_bitrate(&encoding.video_bitrate, &encoding.maxrate, &encoding.bufsize)
        .constant_frame_rate(encoding.fps)
        .pixel_format("yuv420p")
        .video_filter(normalize_filter(size))
        .aac_stereo(&encoding.audio_bitrate, encoding.audio_sample_rate)
        .shortest()
        .map("0:v:0")
        .map("1:a:0")
        .faststart()
}

/// Re-encode one clip to App Preview specs.
pub fn normalize_clip(
    ffmpeg: &str,
    input: &Path,
    output: &Path,
    size: CanvasSize,
    encoding: &EncodingConfig,
) -> StorefrontResult<()> {
    tracing::info!(input = %input.display(), size = %size, "Normalizing clip");
    normalize_command(input, output, size, encoding).run(ffmpeg)
}

/// Result of one device's preview build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PreviewOutcome {
    Created {
        device: String,
        output: PathBuf,
        duration: DurationStatus,
    },
    /// Nothing was written because inputs were missing.
    Skipped { device: String, missing: Vec<PathBuf> },
}

impl PreviewOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Build the App Preview for one device.
///
/// Any missing input skips the whole device. Tool failures are errors.
pub fn build_app_preview(
    target: &PreviewTarget,
    clip_order: &[String],
    config: &AppConfig,
) -> StorefrontResult<PreviewOutcome> {
    let inputs: Vec<PathBuf> = clip_order.iter().map(|c| target.input_path(c)).collect();
    let missing: Vec<PathBuf> = inputs.iter().filter(|p| !p.is_file()).cloned().collect();

    if !missing.is_empty() || inputs.is_empty() {
        for path in &missing {
            tracing::warn!(device = %target.device, path = %path.display(), "Missing preview input");
        }
        tracing::warn!(device = %target.device, "Skipping App Preview");
        return Ok(PreviewOutcome::Skipped {
            device: target.device.clone(),
            missing,
        });
    }

    let output = target.output_path();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let size = target.size();
    tracing::info!(
        device = %target.device,
        size = %size,
        output = %output.display(),
        "Building App Preview"
    );

    let scratch = tempfile::Builder::new()
        .prefix("storefront-preview-")
        .tempdir()?;
    let mut normalized = Vec::with_capacity(inputs.len());
    for (i, (clip, input)) in clip_order.iter().zip(&inputs).enumerate() {
        let path = scratch.path().join(format!("{i:02}_{clip}.mp4"));
        normalize_clip(&config.tools.ffmpeg, input, &path, size, &config.encoding)?;
        normalized.push(path);
    }

    concatenate(
        &config.tools.ffmpeg,
        &normalized,
        &output,
        ConcatMode::Reencode(&config.encoding),
    )?;
    drop(scratch);

    let duration = DurationStatus::classify(
        probe_duration(&config.tools.ffprobe, &output),
        &config.preview,
    );
    match duration {
        DurationStatus::Within { secs } => {
            tracing::info!(device = %target.device, secs, "Duration within App Store limits");
        }
        DurationStatus::TooShort { secs } => {
            tracing::warn!(
                device = %target.device,
                secs,
                min = config.preview.min_duration_secs,
                "App Preview is under the minimum duration"
            );
        }
        DurationStatus::TooLong { secs } => {
            tracing::warn!(
                device = %target.device,
                secs,
                max = config.preview.max_duration_secs,
                "App Preview is over the maximum duration"
            );
        }
        DurationStatus::Unknown => {
            tracing::warn!(device = %target.device, "Could not verify App Preview duration");
        }
    }

    Ok(PreviewOutcome::Created {
        device: target.device.clone(),
        output,
        duration,
    })
}
