//! Localized marketing copy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Copy for one clip in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRecord {
    /// Headline; `\n` separates lines.
    pub headline: String,

    /// Subtitle drawn below the headline; `\n` separates lines.
    pub subtitle: String,

    /// Trailing line near the bottom of portrait cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_proof: Option<String>,
}

impl CopyRecord {
    pub fn new(headline: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            subtitle: subtitle.into(),
            social_proof: None,
        }
    }
}

/// Script-specific font selection for a locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontOverride {
    /// Font file; when absent the configured collection for the locale is used.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Face index inside a collection file.
    #[serde(default)]
    pub index: Option<u32>,
}

/// A locale and its copy, one record per clip in catalog clip order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Locale code (`en-US`, `ja`, `zh-Hant`, ...). Used as the output
    /// directory name.
    pub code: String,

    pub records: Vec<CopyRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontOverride>,
}

impl LanguageEntry {
    pub fn record(&self, clip_index: usize) -> Option<&CopyRecord> {
        self.records.get(clip_index)
    }
}
