//! Clip identities.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::GradientPair;

/// Three teleprompter lines: previous, current (emphasized), next.
pub type TeleprompterLines = [String; 3];

/// A named demo subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Symbolic name, used in output file names.
    pub id: String,

    /// Source video, relative to the configured clips directory.
    pub source: PathBuf,

    /// Background gradient; `top` doubles as the mockup accent.
    pub gradient: GradientPair,

    /// Timestamp of the still frame used for cards.
    #[serde(default)]
    pub frame_timestamp_secs: f64,

    /// Locale code -> teleprompter lines shown on the phone screen.
    #[serde(default)]
    pub teleprompter: BTreeMap<String, TeleprompterLines>,
}

impl Clip {
    pub fn new(id: impl Into<String>, source: impl Into<PathBuf>, gradient: GradientPair) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            gradient,
            frame_timestamp_secs: 0.0,
            teleprompter: BTreeMap::new(),
        }
    }

    /// Absolute (or cwd-relative) path of the source video.
    pub fn source_path(&self, clips_dir: &Path) -> PathBuf {
        if self.source.is_absolute() {
            self.source.clone()
        } else {
            clips_dir.join(&self.source)
        }
    }

    /// Teleprompter lines for `language`, else for `fallback`.
    pub fn teleprompter_for(&self, language: &str, fallback: &str) -> Option<&TeleprompterLines> {
        self.teleprompter
            .get(language)
            .or_else(|| self.teleprompter.get(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> Clip {
        let mut clip = Clip::new(
            "alpha",
            "Portrait/alpha.mp4",
            GradientPair::new((255, 107, 107), (255, 160, 137)),
        );
        clip.teleprompter.insert(
            "en-US".to_string(),
            ["one".to_string(), "two".to_string(), "three".to_string()],
        );
        clip
    }

    #[test]
    fn test_teleprompter_fallback() {
        let clip = clip();
        assert_eq!(clip.teleprompter_for("en-US", "en-US").unwrap()[1], "two");
        assert_eq!(clip.teleprompter_for("de", "en-US").unwrap()[0], "one");
        assert!(clip.teleprompter_for("de", "fr").is_none());
    }

    #[test]
    fn test_source_path_resolution() {
        let clip = clip();
        assert_eq!(
            clip.source_path(Path::new("/assets")),
            PathBuf::from("/assets/Portrait/alpha.mp4")
        );

        let mut absolute = clip.clone();
        absolute.source = PathBuf::from("/videos/alpha.mp4");
        assert_eq!(
            absolute.source_path(Path::new("/assets")),
            PathBuf::from("/videos/alpha.mp4")
        );
    }
}
