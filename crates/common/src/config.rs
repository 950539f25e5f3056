//! Application configuration.
//!
//! Every value has a compiled-in default; a JSON file can override any
//! subset of them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StorefrontError, StorefrontResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the generated card tree.
    pub output_root: PathBuf,

    /// Directory that clip `source` paths are resolved against.
    pub clips_dir: PathBuf,

    /// Font files.
    pub fonts: FontConfig,

    /// App Preview encoding parameters.
    pub encoding: EncodingConfig,

    /// App Preview duration policy.
    pub preview: PreviewPolicy,

    /// In-app event video parameters.
    pub event: EventVideoConfig,

    /// External tool executables.
    pub tools: ToolPaths,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Font resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Default bold face used by every non-overridden locale.
    pub latin_bold: PathBuf,

    /// Multi-face collection scanned for CJK faces.
    pub cjk_collection: PathBuf,

    /// Per-locale dedicated font files (e.g. `th`, `hi`).
    pub overrides: BTreeMap<String, PathBuf>,
}

/// Video encoding parameters for App Preview assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub fps: u32,
    pub video_bitrate: String,
    pub maxrate: String,
    pub bufsize: String,
    pub audio_bitrate: String,
    pub audio_sample_rate: u32,
    pub h264_profile: String,
    pub h264_level: String,
}

/// Allowed App Preview duration range (seconds).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewPolicy {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
}

/// In-app event video parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventVideoConfig {
    /// Seconds kept from the start of each clip.
    pub clip_duration_secs: f64,
    pub fps: u32,
    pub crf: u8,
    pub preset: String,
}

/// External executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffmpeg: String,
    pub ffprobe: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "storefront=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("AppStoreAssets"),
            clips_dir: PathBuf::from("."),
            fonts: FontConfig::default(),
            encoding: EncodingConfig::default(),
            preview: PreviewPolicy::default(),
            event: EventVideoConfig::default(),
            tools: ToolPaths::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            latin_bold: PathBuf::from(
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            ),
            cjk_collection: PathBuf::from("/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc"),
            overrides: BTreeMap::new(),
        }
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            video_bitrate: "10M".to_string(),
            maxrate: "10M".to_string(),
            bufsize: "20M".to_string(),
            audio_bitrate: "256k".to_string(),
            audio_sample_rate: 48000,
            h264_profile: "high".to_string(),
            h264_level: "4.0".to_string(),
        }
    }
}

impl Default for PreviewPolicy {
    fn default() -> Self {
        Self {
            min_duration_secs: 15.0,
            max_duration_secs: 30.0,
        }
    }
}

impl Default for EventVideoConfig {
    fn default() -> Self {
        Self {
            clip_duration_secs: 3.0,
            fps: 30,
            crf: 18,
            preset: "fast".to_string(),
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Errors are not swallowed.
    pub fn load_from(path: impl AsRef<Path>) -> StorefrontResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StorefrontError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| StorefrontError::config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("storefront").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_app_preview_requirements() {
        let config = AppConfig::default();
        assert_eq!(config.encoding.fps, 30);
        assert_eq!(config.encoding.h264_profile, "high");
        assert_eq!(config.encoding.h264_level, "4.0");
        assert_eq!(config.encoding.audio_sample_rate, 48000);
        assert!((config.preview.min_duration_secs - 15.0).abs() < 1e-9);
        assert!((config.preview.max_duration_secs - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "output_root": "out", "encoding": { "fps": 24 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.encoding.fps, 24);
        assert_eq!(config.encoding.video_bitrate, "10M");
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
        assert_eq!(config.event.crf, 18);
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = std::env::temp_dir().join("storefront_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Configuration error"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
