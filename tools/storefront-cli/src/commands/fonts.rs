//! Show the face each language renders with.

use std::path::Path;

use anyhow::Context;
use storefront_common::AppConfig;
use storefront_compositor::fonts::FontSource;
use storefront_compositor::{FontRegistry, Script};

use super::load_catalog;

pub fn run(config: &AppConfig, catalog_path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let mut fonts = FontRegistry::from_config(&config.fonts).context("Failed to load fonts")?;
    fonts.apply_language_overrides(&catalog.languages);

    println!("Default face: {}", config.fonts.latin_bold.display());
    println!("CJK collection: {}", config.fonts.cjk_collection.display());
    if fonts.cjk_indices().is_empty() {
        println!("  No CJK faces detected");
    }
    for (locale, index) in fonts.cjk_indices() {
        println!("  {locale:<8} face #{index}");
    }

    println!();
    println!("Languages:");
    let mut unresolved = 0;
    for code in catalog.language_codes() {
        let script = Script::for_locale(code);
        match fonts.source_for(code) {
            Ok(FontSource::Default) => println!("  {code:<8} default face ({script:?})"),
            Ok(FontSource::Collection { index, .. }) => {
                println!("  {code:<8} collection face #{index} ({script:?})")
            }
            Ok(FontSource::File { path, index }) => {
                println!("  {code:<8} {} #{index} ({script:?})", path.display())
            }
            Err(e) => {
                unresolved += 1;
                println!("  {code:<8} [MISSING] {e}");
            }
        }
    }

    if unresolved > 0 {
        println!("\n{unresolved} language(s) have no usable face.");
    }
    Ok(())
}
