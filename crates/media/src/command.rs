//! ffmpeg argument builder and external tool runner.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use storefront_common::{StorefrontError, StorefrontResult};

/// One `-i` input and the options that precede it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FfmpegInput {
    args: Vec<String>,
    source: String,
}

/// Builder for ffmpeg invocations with any number of inputs.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<FfmpegInput>,
    output_args: Vec<String>,
    output: PathBuf,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Plain file input.
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.input_with(Vec::<String>::new(), path.as_ref().to_string_lossy())
    }

    /// Input preceded by its own options (`-f`, `-ss`, ...).
    pub fn input_with<I, S>(mut self, args: I, source: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(FfmpegInput {
            args: args.into_iter().map(Into::into).collect(),
            source: source.into(),
        });
        self
    }

    /// File input starting at `seconds`.
    pub fn seek_input(self, path: impl AsRef<Path>, seconds: f64) -> Self {
        if seconds > 0.0 {
            self.input_with(["-ss".to_string(), format!("{seconds:.3}")], path.as_ref().to_string_lossy())
        } else {
            self.input(path)
        }
    }

    /// Synthetic `lavfi` source, e.g. `anullsrc=...`.
    pub fn lavfi(self, graph: impl Into<String>) -> Self {
        self.input_with(["-f", "lavfi"], graph)
    }

    /// Concat-demuxer manifest input.
    pub fn concat_manifest(self, manifest: impl AsRef<Path>) -> Self {
        self.input_with(
            ["-f", "concat", "-safe", "0"],
            manifest.as_ref().to_string_lossy(),
        )
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn pair(self, flag: &str, value: impl Into<String>) -> Self {
        self.output_arg(flag).output_arg(value)
    }

    /// Limit output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.pair("-t", format_seconds(seconds))
    }

    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.pair("-vf", filter)
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.pair("-c:v", codec)
    }

    /// H.264 profile and level.
    pub fn h264_profile(self, profile: impl Into<String>, level: impl Into<String>) -> Self {
        self.pair("-profile:v", profile).pair("-level:v", level)
    }

    /// Target bitrate with VBV limits.
    pub fn video_bitrate(
        self,
        bitrate: impl Into<String>,
        maxrate: impl Into<String>,
        bufsize: impl Into<String>,
    ) -> Self {
        self.pair("-b:v", bitrate)
            .pair("-maxrate", maxrate)
            .pair("-bufsize", bufsize)
    }

    pub fn crf(self, crf: u8) -> Self {
        self.pair("-crf", crf.to_string())
    }

    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.pair("-preset", preset)
    }

    /// Constant output frame rate.
    pub fn constant_frame_rate(self, fps: u32) -> Self {
        self.pair("-r", fps.to_string()).pair("-vsync", "cfr")
    }

    pub fn pixel_format(self, format: impl Into<String>) -> Self {
        self.pair("-pix_fmt", format)
    }

    /// AAC stereo at the given bitrate and sample rate.
    pub fn aac_stereo(self, bitrate: impl Into<String>, sample_rate: u32) -> Self {
        self.pair("-c:a", "aac")
            .pair("-b:a", bitrate)
            .pair("-ar", sample_rate.to_string())
            .pair("-ac", "2")
    }

    pub fn map(self, stream: impl Into<String>) -> Self {
        self.pair("-map", stream)
    }

    /// Stop at the end of the shortest input.
    pub fn shortest(self) -> Self {
        self.output_arg("-shortest")
    }

    /// Move the moov atom to the front.
    pub fn faststart(self) -> Self {
        self.pair("-movflags", "+faststart")
    }

    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    /// Copy streams without re-encoding.
    pub fn stream_copy(self) -> Self {
        self.pair("-c", "copy")
    }

    /// Write a single best-quality frame.
    pub fn single_frame(self) -> Self {
        self.pair("-frames:v", "1").pair("-q:v", "1")
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Full argument list, without the program name.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }
        args.push("-hide_banner".to_string());
        args.push("-loglevel".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.source.clone());
        }

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());
        args
    }

    /// Run with the given ffmpeg executable.
    pub fn run(&self, ffmpeg: &str) -> StorefrontResult<()> {
        run_tool(ffmpeg, &self.build_args()).map(|_| ())
    }
}

fn format_seconds(seconds: f64) -> String {
    let text = format!("{seconds:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Run an external tool to completion, capturing its output.
///
/// A missing executable maps to `ToolMissing`; a non-zero exit maps to
/// `ToolFailed` with the tail of stderr.
pub fn run_tool(program: &str, args: &[String]) -> StorefrontResult<Output> {
    tracing::debug!(tool = program, args = ?args, "Running external tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorefrontError::ToolMissing {
                tool: program.to_string(),
            },
            _ => StorefrontError::media(format!("Failed to start {program}: {e}")),
        })?;

    if !output.status.success() {
        let status = output
            .status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(tool = program, %status, "External tool failed");
        return Err(StorefrontError::tool_failed(program, status, &stderr));
    }

    Ok(output)
}

/// Whether `binary` resolves on `PATH` (or is an existing path).
pub fn command_exists(binary: &str) -> bool {
    if binary.contains('/') {
        return Path::new(binary).is_file();
    }
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_orders_inputs_and_output() {
        let args = FfmpegCommand::new("out.mp4")
            .input("in.mp4")
            .lavfi("anullsrc=channel_layout=stereo:sample_rate=48000")
            .video_codec("libx264")
            .shortest()
            .build_args();

        assert_eq!(
            args,
            vec![
                "-y",
                "-hide_banner",
                "-loglevel",
                "error",
                "-i",
                "in.mp4",
                "-f",
                "lavfi",
                "-i",
                "anullsrc=channel_layout=stereo:sample_rate=48000",
                "-c:v",
                "libx264",
                "-shortest",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn test_seek_input_only_when_positive() {
        let args = FfmpegCommand::new("f.png").seek_input("v.mp4", 1.5).build_args();
        let i = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[i + 1], "1.500");
        assert_eq!(args[i + 2], "-i");

        let args = FfmpegCommand::new("f.png").seek_input("v.mp4", 0.0).build_args();
        assert!(!args.iter().any(|a| a == "-ss"));
    }

    #[test]
    fn test_concat_manifest_input() {
        let args = FfmpegCommand::new("o.mp4")
            .concat_manifest("o.mp4.concat.txt")
            .stream_copy()
            .build_args();
        let joined = args.join(" ");
        assert!(joined.contains("-f concat -safe 0 -i o.mp4.concat.txt -c copy o.mp4"));
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_seconds(3.0), "3");
        assert_eq!(format_seconds(2.5), "2.5");
    }

    #[test]
    fn test_missing_tool_maps_to_tool_missing() {
        let err = run_tool("storefront-definitely-not-a-tool", &[]).unwrap_err();
        assert!(matches!(err, StorefrontError::ToolMissing { .. }));
    }

    #[test]
    fn test_failing_tool_keeps_stderr_tail() {
        if !command_exists("sh") {
            return;
        }
        let err = run_tool(
            "sh",
            &["-c".to_string(), "echo boom >&2; exit 3".to_string()],
        )
        .unwrap_err();
        match err {
            StorefrontError::ToolFailed {
                tool,
                status,
                stderr_tail,
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(status, "exit code 3");
                assert_eq!(stderr_tail, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
