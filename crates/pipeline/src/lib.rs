//! Storefront Pipeline
//!
//! Drives whole runs: every (device, language, clip, size) card from one
//! captured frame per clip, plus the App Preview and event video batches.
//! Each card run leaves a `report.json` next to the generated tree.

pub mod batch;
pub mod report;
pub mod videos;

pub use batch::{BatchDriver, BatchOptions, Selection};
pub use report::{RunReport, SkippedClip};
pub use videos::{run_event_videos, run_previews};
