//! Assemble App Preview videos.

use std::path::Path;

use storefront_common::AppConfig;
use storefront_media::{DurationStatus, PreviewOutcome};
use storefront_pipeline::run_previews;

use super::{filter, load_catalog};

pub fn run(config: &AppConfig, catalog_path: Option<&Path>, devices: Vec<String>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let devices = filter(devices);

    println!("Building App Previews");
    println!("  Clip order: {}", catalog.previews.clip_order.join(", "));
    println!(
        "  Allowed duration: {}-{}s",
        config.preview.min_duration_secs, config.preview.max_duration_secs
    );

    let outcomes = run_previews(&catalog, config, devices.as_deref())?;

    println!();
    for outcome in &outcomes {
        match outcome {
            PreviewOutcome::Created {
                device,
                output,
                duration,
            } => {
                let note = match duration {
                    DurationStatus::Within { secs } => format!("{secs:.2}s"),
                    DurationStatus::TooShort { secs } => format!("{secs:.2}s (too short)"),
                    DurationStatus::TooLong { secs } => format!("{secs:.2}s (too long)"),
                    DurationStatus::Unknown => "duration unknown".to_string(),
                };
                println!("[OK]   {device}: {} ({note})", output.display());
            }
            PreviewOutcome::Skipped { device, missing } => {
                println!("[SKIP] {device}: {} missing input(s)", missing.len());
                for path in missing {
                    println!("       - {}", path.display());
                }
            }
        }
    }

    let created = outcomes.iter().filter(|o| o.is_created()).count();
    if created == 0 {
        anyhow::bail!("No App Previews were created");
    }
    println!("\n{created} App Preview(s) created.");
    Ok(())
}
