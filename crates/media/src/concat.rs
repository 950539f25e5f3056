//! Concat-demuxer manifests and concatenation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use storefront_common::{EncodingConfig, StorefrontError, StorefrontResult};

use crate::command::FfmpegCommand;

/// How clips are joined.
#[derive(Debug, Clone, Copy)]
pub enum ConcatMode<'a> {
    /// Re-encode to the App Preview profile.
    Reencode(&'a EncodingConfig),
    /// Join streams as-is.
    StreamCopy,
}

/// A `<output>.concat.txt` manifest, deleted when dropped.
#[derive(Debug)]
pub struct ConcatManifest {
    path: PathBuf,
}

impl ConcatManifest {
    /// Manifest location for `output`.
    pub fn path_for(output: &Path) -> PathBuf {
        let mut name = OsString::from(output.as_os_str());
        name.push(".concat.txt");
        PathBuf::from(name)
    }

    /// Write one `file '<absolute path>'` line per clip.
    pub fn write(output: &Path, clips: &[PathBuf]) -> StorefrontResult<Self> {
        let path = Self::path_for(output);
        let mut body = String::new();
        for clip in clips {
            let absolute = absolute_path(clip)?;
            body.push_str(&manifest_line(&absolute));
            body.push('\n');
        }
        std::fs::write(&path, body)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConcatManifest {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), "Failed to remove concat manifest: {}", e);
            }
        }
    }
}

/// `file '<path>'`, with single quotes escaped for the concat demuxer.
pub fn manifest_line(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{escaped}'")
}

fn absolute_path(path: &Path) -> StorefrontResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::fs::canonicalize(path).or_else(|_| Ok(std::env::current_dir()?.join(path)))
}

/// Concatenate `clips` into `output`. The manifest is removed whether or
/// not ffmpeg succeeds.
pub fn concatenate(
    ffmpeg: &str,
    clips: &[PathBuf],
    output: &Path,
    mode: ConcatMode<'_>,
) -> StorefrontResult<()> {
    if clips.is_empty() {
        return Err(StorefrontError::media("nothing to concatenate"));
    }

    let manifest = ConcatManifest::write(output, clips)?;
    let command = FfmpegCommand::new(output).concat_manifest(manifest.path());
    let command = match mode {
        ConcatMode::Reencode(encoding) => command
            .video_codec("libx264")
            .h264_profile(&encoding.h264_profile, &encoding.h264_level)
            .video_bitrate(&encoding.video_bitrate, &encoding.maxrate, &encoding.bufsize)
            .constant_frame_rate(encoding.fps)
            .pixel_format("yuv420p")
            .aac_stereo(&encoding.audio_bitrate, encoding.audio_sample_rate)
            .faststart(),
        ConcatMode::StreamCopy => command.stream_copy(),
    };

    tracing::info!(
        output = %output.display(),
        clips = clips.len(),
        "Concatenating clips"
    );
    command.run(ffmpeg)
}
