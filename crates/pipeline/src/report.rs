//! Run report written after a card batch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_common::StorefrontResult;
use storefront_compositor::LayoutPolicy;

/// File name of the report inside the output root.
pub const REPORT_FILE: &str = "report.json";

/// A clip left out of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedClip {
    pub clip: String,
    pub source: PathBuf,
    pub reason: String,
}

/// Summary of one card batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub output_root: PathBuf,
    pub layout: LayoutPolicy,

    /// Device -> language -> cards written.
    pub cards: BTreeMap<String, BTreeMap<String, usize>>,

    pub skipped: Vec<SkippedClip>,
}

impl RunReport {
    pub fn new(output_root: impl Into<PathBuf>, layout: LayoutPolicy) -> Self {
        Self {
            generated_at: Utc::now(),
            output_root: output_root.into(),
            layout,
            cards: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_card(&mut self, device: &str, language: &str) {
        *self
            .cards
            .entry(device.to_string())
            .or_default()
            .entry(language.to_string())
            .or_default() += 1;
    }

    pub fn total_cards(&self) -> usize {
        self.cards.values().flat_map(|langs| langs.values()).sum()
    }

    pub fn path(&self) -> PathBuf {
        self.output_root.join(REPORT_FILE)
    }

    pub fn save(&self) -> StorefrontResult<PathBuf> {
        let path = self.path();
        std::fs::create_dir_all(&self.output_root)?;
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> StorefrontResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_counts() {
        let mut report = RunReport::new("out", LayoutPolicy::PlainStroke);
        report.record_card("iPhone", "en-US");
        report.record_card("iPhone", "en-US");
        report.record_card("iPad", "ja");
        assert_eq!(report.total_cards(), 3);
        assert_eq!(report.cards["iPhone"]["en-US"], 2);
    }

    #[test]
    fn test_report_json_shape() {
        let report = RunReport::new("out", LayoutPolicy::LabelBlockTop);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["layout"], "label_block_top");
        let stamp = value["generated_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
