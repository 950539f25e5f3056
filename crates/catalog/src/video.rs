//! Video assembly targets: App Previews and in-app event videos.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::device::CanvasSize;

/// App Preview assembly settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PreviewSettings {
    /// Order in which clips appear in the final preview.
    pub clip_order: Vec<String>,

    pub targets: Vec<PreviewTarget>,
}

/// One App Preview video per device family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewTarget {
    pub device: String,

    /// Directory holding `<prefix>_<clip>.mp4` inputs.
    pub input_dir: PathBuf,

    pub filename_prefix: String,

    pub width: u32,
    pub height: u32,

    /// Output path; defaults to `<input_dir>/app_preview_<device>.mp4`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl PreviewTarget {
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    /// Input file for a clip, e.g. `demo_vids/iPhone/iphone_demo_woman_1.mp4`.
    pub fn input_path(&self, clip: &str) -> PathBuf {
        self.input_dir
            .join(format!("{}_{}.mp4", self.filename_prefix, clip))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.input_dir
                .join(format!("app_preview_{}.mp4", self.device))
        })
    }
}

/// In-app event video settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventSettings {
    pub clip_order: Vec<String>,
    pub targets: Vec<EventVideoTarget>,
}

/// One trimmed-and-concatenated event video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventVideoTarget {
    pub name: String,

    /// Directory holding `<clip>.mp4` inputs.
    pub source_dir: PathBuf,

    pub width: u32,
    pub height: u32,

    pub output: PathBuf,
}

impl EventVideoTarget {
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn input_path(&self, clip: &str) -> PathBuf {
        self.source_dir.join(format!("{clip}.mp4"))
    }
}
