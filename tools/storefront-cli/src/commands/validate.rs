//! Validate a catalog.

use std::path::Path;

use super::load_catalog;

pub fn run(path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => println!("Validating catalog at: {}", p.display()),
        None => println!("Validating built-in catalog"),
    }

    let catalog = load_catalog(path)?;

    println!("  Version: {}", catalog.version);
    println!("  Default language: {}", catalog.default_language);
    println!("  Clips: {}", catalog.clips.len());
    println!("  Languages: {}", catalog.languages.len());
    for device in &catalog.devices {
        let sizes: Vec<String> = device.sizes.iter().map(|s| s.to_string()).collect();
        println!("  {}: {}", device.name, sizes.join(", "));
    }
    println!("  Preview targets: {}", catalog.previews.targets.len());
    println!("  Event targets: {}", catalog.events.targets.len());

    let errors = catalog.validate();
    if errors.is_empty() {
        println!("\nCatalog is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for error in &errors {
        println!("  - {error}");
    }
    anyhow::bail!("{} issue(s) found", errors.len())
}
