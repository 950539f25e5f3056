pub mod cards;
pub mod check;
pub mod event;
pub mod fonts;
pub mod init_catalog;
pub mod preview;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use storefront_catalog::Catalog;

/// Load `path`, or the built-in catalog when none is given.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let catalog = Catalog::load_or_builtin(path).with_context(|| match path {
        Some(p) => format!("Failed to load catalog {}", p.display()),
        None => "Failed to load built-in catalog".to_string(),
    })?;
    Ok(catalog)
}

/// Empty repeatable flag means "everything".
pub fn filter(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
