//! The catalog: everything a run needs to know about clips, copy and targets.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storefront_common::StorefrontError;

use crate::clip::Clip;
use crate::device::DeviceTarget;
use crate::language::{CopyRecord, LanguageEntry};
use crate::video::{EventSettings, PreviewSettings};

const BUILTIN_CATALOG: &str = include_str!("../assets/builtin_catalog.json");

/// Current catalog format version.
pub const CATALOG_VERSION: &str = "1.0";

/// Clips, localized copy, device sizes and video targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,

    /// Locale whose teleprompter lines are used when a language has none.
    pub default_language: String,

    /// Clips in card order. Language records are indexed by this order.
    pub clips: Vec<Clip>,

    pub languages: Vec<LanguageEntry>,

    pub devices: Vec<DeviceTarget>,

    #[serde(default)]
    pub previews: PreviewSettings,

    #[serde(default)]
    pub events: EventSettings,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        serde_json::from_str(BUILTIN_CATALOG).map_err(|e| CatalogError::Parse {
            path: PathBuf::from("<builtin>"),
            source: e,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` when given, else the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check structural consistency. Returns a list of problems (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        if self.clips.is_empty() {
            errors.push("Catalog has no clips".to_string());
        }

        let mut clip_ids = HashSet::new();
        for clip in &self.clips {
            if clip.id.trim().is_empty() {
                errors.push("Clip with empty id".to_string());
            }
            if !clip_ids.insert(clip.id.as_str()) {
                errors.push(format!("Duplicate clip id: {}", clip.id));
            }
            if !clip.frame_timestamp_secs.is_finite() || clip.frame_timestamp_secs < 0.0 {
                errors.push(format!(
                    "Clip {} has invalid frame timestamp {}",
                    clip.id, clip.frame_timestamp_secs
                ));
            }
        }

        let mut codes = HashSet::new();
        for language in &self.languages {
            if !codes.insert(language.code.as_str()) {
                errors.push(format!("Duplicate language code: {}", language.code));
            }
            if language.records.len() != self.clips.len() {
                errors.push(format!(
                    "Language {} has {} records but catalog has {} clips",
                    language.code,
                    language.records.len(),
                    self.clips.len()
                ));
            }
        }

        if !self.languages.is_empty() && !codes.contains(self.default_language.as_str()) {
            errors.push(format!(
                "Default language {} has no copy",
                self.default_language
            ));
        }

        for device in &self.devices {
            if device.sizes.is_empty() {
                errors.push(format!("Device {} has no canvas sizes", device.name));
            }
            for size in device.sizes.iter().filter(|s| s.is_empty()) {
                errors.push(format!("Device {} has zero-sized canvas {size}", device.name));
            }
        }

        for target in &self.previews.targets {
            if target.size().is_empty() {
                errors.push(format!("Preview target {} has zero size", target.device));
            }
        }
        for target in &self.events.targets {
            if target.size().is_empty() {
                errors.push(format!("Event target {} has zero size", target.name));
            }
        }

        errors
    }

    /// `validate()` folded into a single error.
    pub fn ensure_valid(&self) -> Result<(), CatalogError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation {
                message: errors.join("; "),
            })
        }
    }

    pub fn clip(&self, id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn clip_index(&self, id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    pub fn language(&self, code: &str) -> Option<&LanguageEntry> {
        self.languages.iter().find(|l| l.code == code)
    }

    pub fn device(&self, name: &str) -> Option<&DeviceTarget> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Copy for a (clip, language) pair.
    pub fn record_for(&self, clip_id: &str, language: &str) -> Option<&CopyRecord> {
        let index = self.clip_index(clip_id)?;
        self.language(language)?.record(index)
    }

    pub fn language_codes(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.code.as_str()).collect()
    }
}

/// Errors loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid catalog: {message}")]
    Validation { message: String },
}

impl From<CatalogError> for StorefrontError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                StorefrontError::FileNotFound { path }
            }
            other => StorefrontError::catalog(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::GradientPair;
    use crate::device::CanvasSize;

    fn small_catalog() -> Catalog {
        Catalog {
            version: CATALOG_VERSION.to_string(),
            default_language: "en-US".to_string(),
            clips: vec![
                Clip::new("alpha", "alpha.mp4", GradientPair::new((255, 107, 107), (255, 160, 137))),
                Clip::new("beta", "beta.mp4", GradientPair::new((46, 196, 182), (86, 227, 215))),
            ],
            languages: vec![LanguageEntry {
                code: "en-US".to_string(),
                records: vec![
                    CopyRecord::new("Nail Every Take", "Professional teleprompter\nat your fingertips"),
                    CopyRecord::new("Speak With\nConfidence", "Read your script"),
                ],
                font: None,
            }],
            devices: vec![DeviceTarget {
                name: "iPhone".to_string(),
                sizes: vec![CanvasSize::new(1284, 2778)],
            }],
            previews: PreviewSettings::default(),
            events: EventSettings::default(),
        }
    }

    #[test]
    fn test_small_catalog_is_valid() {
        assert!(small_catalog().validate().is_empty());
    }

    #[test]
    fn test_record_count_mismatch_rejected() {
        let mut catalog = small_catalog();
        catalog.languages[0].records.pop();
        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("1 records"));
        assert!(catalog.ensure_valid().is_err());
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut catalog = small_catalog();
        catalog.clips[1].id = "alpha".to_string();
        let lang = catalog.languages[0].clone();
        catalog.languages.push(lang);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate clip id")));
        assert!(errors.iter().any(|e| e.contains("Duplicate language code")));
    }

    #[test]
    fn test_zero_canvas_rejected() {
        let mut catalog = small_catalog();
        catalog.devices[0].sizes.push(CanvasSize::new(0, 100));
        assert!(catalog
            .validate()
            .iter()
            .any(|e| e.contains("zero-sized canvas 0x100")));
    }

    #[test]
    fn test_record_lookup() {
        let catalog = small_catalog();
        let record = catalog.record_for("beta", "en-US").unwrap();
        assert_eq!(record.headline, "Speak With\nConfidence");
        assert!(catalog.record_for("gamma", "en-US").is_none());
        assert!(catalog.record_for("alpha", "fr").is_none());
    }

    #[test]
    fn test_missing_file_maps_to_file_not_found() {
        let err = Catalog::load("/nonexistent/storefront/catalog.json").unwrap_err();
        let err: StorefrontError = err.into();
        assert!(err.is_missing_input());
    }
}
