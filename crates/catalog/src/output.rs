//! Deterministic output naming for cards.

use std::path::{Path, PathBuf};

use crate::device::CanvasSize;

/// `<clip>_<width>x<height>.png`
pub fn card_file_name(clip_id: &str, size: CanvasSize) -> String {
    format!("{clip_id}_{size}.png")
}

/// `<root>/<device>/<language>/<clip>_<width>x<height>.png`
///
/// Unique per (device, language, clip, resolution).
pub fn card_path(
    root: &Path,
    device: &str,
    language: &str,
    clip_id: &str,
    size: CanvasSize,
) -> PathBuf {
    root.join(device)
        .join(language)
        .join(card_file_name(clip_id, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_card_path_layout() {
        let path = card_path(
            Path::new("AppStoreAssets"),
            "iPhone",
            "en-US",
            "woman_1",
            CanvasSize::new(1284, 2778),
        );
        assert_eq!(
            path,
            PathBuf::from("AppStoreAssets/iPhone/en-US/woman_1_1284x2778.png")
        );
    }

    proptest! {
        #[test]
        fn card_paths_are_unique(
            sizes in proptest::collection::hash_set((1u32..5000, 1u32..5000), 1..8),
        ) {
            let devices = ["iPhone", "iPad"];
            let languages = ["en-US", "ja", "zh-Hant"];
            let clips = ["woman_1", "man_1"];
            let mut seen = HashSet::new();
            let mut total = 0usize;
            for device in devices {
                for language in languages {
                    for clip in clips {
                        for &(w, h) in &sizes {
                            total += 1;
                            seen.insert(card_path(
                                Path::new("out"),
                                device,
                                language,
                                clip,
                                CanvasSize::new(w, h),
                            ));
                        }
                    }
                }
            }
            prop_assert_eq!(seen.len(), total);
        }
    }
}
