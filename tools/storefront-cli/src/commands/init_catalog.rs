//! Write the built-in catalog to an editable file.

use std::path::PathBuf;

use anyhow::Context;
use storefront_catalog::Catalog;

pub fn run(path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let catalog = Catalog::builtin().context("Built-in catalog is corrupt")?;
    catalog
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Catalog written to {}", path.display());
    println!("  Clips: {}", catalog.clips.len());
    println!("  Languages: {}", catalog.language_codes().join(", "));
    println!(
        "  Devices: {}",
        catalog
            .devices
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
    println!("Pass it back with: storefront --catalog {} cards", path.display());

    Ok(())
}
