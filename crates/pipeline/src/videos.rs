//! Video batches: App Previews per device and in-app event videos.

use storefront_catalog::{Catalog, EventVideoTarget, PreviewTarget};
use storefront_common::{AppConfig, StorefrontResult};
use storefront_media::{build_app_preview, build_event_video, EventVideoOutcome, PreviewOutcome};

/// Build the App Preview for every (selected) device. Input directories are
/// resolved against the configured clips directory.
///
/// Devices with missing inputs come back as `Skipped`; tool failures abort.
pub fn run_previews(
    catalog: &Catalog,
    config: &AppConfig,
    devices: Option<&[String]>,
) -> StorefrontResult<Vec<PreviewOutcome>> {
    let previews = &catalog.previews;
    tracing::info!(
        clip_order = ?previews.clip_order,
        profile = %config.encoding.h264_profile,
        level = %config.encoding.h264_level,
        bitrate = %config.encoding.video_bitrate,
        fps = config.encoding.fps,
        "Building App Previews"
    );

    previews
        .targets
        .iter()
        .filter(|t| devices.map_or(true, |names| names.iter().any(|n| *n == t.device)))
        .map(|target| {
            let resolved = PreviewTarget {
                input_dir: config.clips_dir.join(&target.input_dir),
                ..target.clone()
            };
            build_app_preview(&resolved, &previews.clip_order, config)
        })
        .collect()
}

/// Build every (selected) event video. Source directories are resolved
/// against the configured clips directory.
pub fn run_event_videos(
    catalog: &Catalog,
    config: &AppConfig,
    names: Option<&[String]>,
) -> StorefrontResult<Vec<EventVideoOutcome>> {
    let events = &catalog.events;
    events
        .targets
        .iter()
        .filter(|t| names.map_or(true, |names| names.iter().any(|n| *n == t.name)))
        .map(|target| {
            let resolved = EventVideoTarget {
                source_dir: config.clips_dir.join(&target.source_dir),
                ..target.clone()
            };
            build_event_video(
                &config.tools.ffmpeg,
                &resolved,
                &events.clip_order,
                &config.event,
            )
        })
        .collect()
}
