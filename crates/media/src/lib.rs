//! Storefront Media
//!
//! Everything that shells out to `ffmpeg` or `ffprobe`:
//! - **Frame capture:** one still per clip for card composition
//! - **App Previews:** normalize each clip to App Store specs, concatenate,
//!   check the duration policy
//! - **Event videos:** trim, cover-scale and stream-copy concatenate
//!
//! Calls are synchronous. A non-zero exit is a hard failure carrying the
//! tail of the tool's stderr; nothing is retried.

pub mod command;
pub mod concat;
pub mod event;
pub mod frame;
pub mod preview;
pub mod probe;

pub use command::{command_exists, run_tool, FfmpegCommand};
pub use concat::{concatenate, ConcatManifest, ConcatMode};
pub use event::{build_event_video, EventVideoOutcome};
pub use frame::{FfmpegFrameSource, FrameSource};
pub use preview::{build_app_preview, normalize_clip, PreviewOutcome};
pub use probe::{probe_duration, DurationStatus};
