//! Build in-app event videos.

use std::path::Path;

use storefront_common::AppConfig;
use storefront_pipeline::run_event_videos;

use super::{filter, load_catalog};

pub fn run(config: &AppConfig, catalog_path: Option<&Path>, names: Vec<String>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let names = filter(names);

    println!("Building event videos");
    println!("  Clip order: {}", catalog.events.clip_order.join(", "));
    println!(
        "  {}s per clip, {} fps, crf {}",
        config.event.clip_duration_secs, config.event.fps, config.event.crf
    );

    let outcomes = run_event_videos(&catalog, config, names.as_deref())?;
    if outcomes.is_empty() {
        anyhow::bail!("No event targets matched");
    }

    println!();
    for outcome in &outcomes {
        println!(
            "[OK] {}: {} ({} clips)",
            outcome.name,
            outcome.output.display(),
            outcome.clips
        );
    }
    Ok(())
}
