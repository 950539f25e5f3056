//! Duration probing and the App Preview duration policy.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use storefront_common::PreviewPolicy;

/// Container duration in seconds.
///
/// `None` when ffprobe is missing, fails, or prints something unparsable.
pub fn probe_duration(ffprobe: &str, path: &Path) -> Option<f64> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration(raw: &str) -> Option<f64> {
    let value = raw.lines().next()?.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Outcome of checking a duration against a [`PreviewPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DurationStatus {
    Within { secs: f64 },
    TooShort { secs: f64 },
    TooLong { secs: f64 },
    Unknown,
}

impl DurationStatus {
    /// Bounds are inclusive.
    pub fn classify(duration: Option<f64>, policy: &PreviewPolicy) -> Self {
        match duration {
            None => Self::Unknown,
            Some(secs) if secs < policy.min_duration_secs => Self::TooShort { secs },
            Some(secs) if secs > policy.max_duration_secs => Self::TooLong { secs },
            Some(secs) => Self::Within { secs },
        }
    }

    pub fn is_within(&self) -> bool {
        matches!(self, Self::Within { .. })
    }
}
