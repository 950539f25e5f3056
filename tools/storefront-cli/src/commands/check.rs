//! Check tools, fonts and clip sources.

use std::path::Path;

use storefront_common::{config_file_path, AppConfig};
use storefront_media::command_exists;

use super::load_catalog;

fn report(ok: bool, label: &str, detail: impl std::fmt::Display) -> bool {
    let tag = if ok { "[OK]  " } else { "[MISS]" };
    println!("{tag} {label}: {detail}");
    ok
}

pub fn run(config: &AppConfig, catalog_path: Option<&Path>) -> anyhow::Result<()> {
    println!("Storefront System Check");
    println!("{}", "=".repeat(50));

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK]   Config: {}", config_path.display());
    } else {
        println!("[INFO] Config: defaults ({} not found)", config_path.display());
    }

    let mut required_ok = true;
    required_ok &= report(command_exists(&config.tools.ffmpeg), "ffmpeg", &config.tools.ffmpeg);
    required_ok &= report(command_exists(&config.tools.ffprobe), "ffprobe", &config.tools.ffprobe);
    required_ok &= report(
        config.fonts.latin_bold.is_file(),
        "Default font",
        config.fonts.latin_bold.display(),
    );
    // Only CJK locales need the collection.
    report(
        config.fonts.cjk_collection.is_file(),
        "CJK collection",
        config.fonts.cjk_collection.display(),
    );
    for (locale, path) in &config.fonts.overrides {
        report(path.is_file(), &format!("Font for {locale}"), path.display());
    }

    let catalog = load_catalog(catalog_path)?;
    let errors = catalog.validate();
    required_ok &= report(
        errors.is_empty(),
        "Catalog",
        format!(
            "{} clips, {} languages, {} devices",
            catalog.clips.len(),
            catalog.languages.len(),
            catalog.devices.len()
        ),
    );
    for error in &errors {
        println!("       - {error}");
    }

    println!();
    println!("Clip sources ({}):", config.clips_dir.display());
    let mut present = 0;
    for clip in &catalog.clips {
        let source = clip.source_path(&config.clips_dir);
        if report(source.is_file(), &clip.id, source.display()) {
            present += 1;
        }
    }

    println!();
    if required_ok && present > 0 {
        println!(
            "Ready: {present}/{} clip source(s) available.",
            catalog.clips.len()
        );
    } else {
        println!("Some requirements are missing. See above.");
    }

    Ok(())
}
