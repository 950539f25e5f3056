//! Still-frame capture.

use std::path::Path;

use image::RgbaImage;
use storefront_common::{StorefrontError, StorefrontResult};

use crate::command::FfmpegCommand;

/// Produces a still frame from a video.
pub trait FrameSource {
    /// Capture the frame at `timestamp_secs`.
    ///
    /// A missing `video` must be reported as `FileNotFound` so callers can
    /// skip the clip.
    fn capture(&self, video: &Path, timestamp_secs: f64) -> StorefrontResult<RgbaImage>;
}

/// Frame capture through `ffmpeg`, via a scratch PNG in a temporary directory.
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    ffmpeg: String,
}

impl FfmpegFrameSource {
    pub fn new(ffmpeg: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }
}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FrameSource for FfmpegFrameSource {
    fn capture(&self, video: &Path, timestamp_secs: f64) -> StorefrontResult<RgbaImage> {
        if !video.is_file() {
            return Err(StorefrontError::FileNotFound {
                path: video.to_path_buf(),
            });
        }

        let scratch = tempfile::Builder::new()
            .prefix("storefront-frame-")
            .tempdir()?;
        let frame_path = scratch.path().join("frame.png");

        FfmpegCommand::new(&frame_path)
            .seek_input(video, timestamp_secs)
            .single_frame()
            .run(&self.ffmpeg)?;

        if !frame_path.is_file() {
            return Err(StorefrontError::media(format!(
                "ffmpeg produced no frame for {} at {timestamp_secs}s",
                video.display()
            )));
        }

        let frame = image::open(&frame_path)?.to_rgba8();
        tracing::info!(
            video = %video.display(),
            width = frame.width(),
            height = frame.height(),
            "Captured frame"
        );
        Ok(frame)
    }
}
