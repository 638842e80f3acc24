//! Static item catalog loaded at startup.
//!
//! The catalog is a JSON array read once during boot and held in memory
//! behind an `Arc`; nothing mutates it afterwards. Item JSON keeps the
//! legacy field names the catalog file and the browser frontend share
//! (`nome`, `preco`, `nao_lancado`, ...).

pub mod query;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use avkn_gifts_core::{ItemId, Price};

/// Errors loading the catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid item array.
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A virtual item in the gift catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "preco")]
    pub price: Price,
    /// Release date as a `DD/MM/YYYY ...` formatted string.
    #[serde(rename = "data_lancamento", default)]
    pub release_date: String,
    /// Unreleased items are excluded from every listing.
    #[serde(rename = "nao_lancado", default)]
    pub unreleased: bool,
    #[serde(rename = "imagem", default)]
    pub image: String,
}

/// The immutable item catalog.
///
/// Cheaply cloneable; shared across all handlers.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Arc<Vec<Item>>,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let items: Vec<Item> = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(
            total = items.len(),
            released = items.iter().filter(|i| !i.unreleased).count(),
            "Catalog loaded"
        );

        Ok(Self::from_items(items))
    }

    /// Build a catalog from an in-memory item list.
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// All items, released or not.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of released items (what listings can ever show).
    #[must_use]
    pub fn released_count(&self) -> usize {
        self.released().count()
    }

    /// Sorted, deduplicated category names across released items.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.released().map(|i| i.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Sorted, deduplicated subcategory names for a category.
    ///
    /// `None` means all categories.
    #[must_use]
    pub fn subcategories(&self, category: Option<&str>) -> Vec<String> {
        let mut subcategories: Vec<String> = self
            .released()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .map(|i| i.subcategory.clone())
            .collect();
        subcategories.sort();
        subcategories.dedup();
        subcategories
    }

    /// Highest released-item price, rounded up to the nearest 1,000 coins
    /// (the price-slider upper bound).
    #[must_use]
    pub fn max_price(&self) -> Price {
        let max = self
            .released()
            .map(|i| i.price.as_coins())
            .max()
            .unwrap_or(0);
        Price::new(max.div_ceil(1_000) * 1_000)
    }

    fn released(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| !i.unreleased)
    }
}
