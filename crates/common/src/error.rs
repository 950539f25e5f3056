//! Error types shared across Storefront crates.

use std::path::PathBuf;

/// Number of trailing stderr characters kept when an external tool fails.
pub const STDERR_TAIL_CHARS: usize = 2000;

/// Top-level error type for Storefront operations.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Media error: {message}")]
    Media { message: String },

    #[error("Font error: {message}")]
    Font { message: String },

    #[error("Font not found: {path}")]
    FontNotFound { path: PathBuf },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("{tool} is not installed or not in PATH")]
    ToolMissing { tool: String },

    #[error("{tool} failed ({status}): {stderr_tail}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr_tail: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using StorefrontError.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

impl StorefrontError {
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media {
            message: msg.into(),
        }
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font {
            message: msg.into(),
        }
    }

    /// Build a `ToolFailed` error, keeping only the tail of stderr.
    pub fn tool_failed(tool: impl Into<String>, status: impl ToString, stderr: &str) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            status: status.to_string(),
            stderr_tail: stderr_tail(stderr, STDERR_TAIL_CHARS),
        }
    }

    /// Whether this error means an input asset is absent (skippable).
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

/// Last `max_chars` characters of `stderr`, trimmed.
pub fn stderr_tail(stderr: &str, max_chars: usize) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= max_chars {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail_keeps_last_chars() {
        let long = "a".repeat(10) + "tail";
        assert_eq!(stderr_tail(&long, 4), "tail");
        assert_eq!(stderr_tail("  short\n", 100), "short");
    }

    #[test]
    fn test_stderr_tail_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(stderr_tail(text, 2), "éé");
    }

    #[test]
    fn test_tool_failed_display_includes_tool_and_tail() {
        let err = StorefrontError::tool_failed("ffmpeg", "exit status: 1", "boom: no such filter");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg failed"));
        assert!(msg.contains("no such filter"));
    }

    #[test]
    fn test_missing_input_classification() {
        let missing = StorefrontError::FileNotFound {
            path: PathBuf::from("Portrait/woman_1.mp4"),
        };
        assert!(missing.is_missing_input());
        assert!(!StorefrontError::render("x").is_missing_input());
    }
}
