//! Catalog validation command.
//!
//! Loads a catalog file the same way the storefront does at startup, so a
//! broken file is caught before a deploy instead of during one.

use std::path::Path;

use avkn_gifts_storefront::catalog::{Catalog, CatalogError};

const DEFAULT_CATALOG_PATH: &str = "crates/storefront/data/items.json";

/// Load and validate a catalog file, logging a summary.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be read or parsed.
pub fn check(path: Option<&Path>) -> Result<(), CatalogError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CATALOG_PATH));
    let catalog = Catalog::load(path)?;

    tracing::info!(
        path = %path.display(),
        items = catalog.len(),
        released = catalog.released_count(),
        categories = catalog.categories().len(),
        max_price = %catalog.max_price(),
        "Catalog OK"
    );
    Ok(())
}
