//! Cart state and admission policy.
//!
//! The cart itself is persistence-agnostic: it lives inside the session
//! state object and is loaded/saved by the orchestration layer.

use serde::{Deserialize, Serialize};

use avkn_gifts_core::{ItemId, OwnershipStatus, Price};

use crate::catalog::Item;

/// Configured cart admission caps.
///
/// Product tuning has moved all three between releases; they are runtime
/// configuration (environment plus the `app_settings` table), never
/// constants at call sites. `None` disables a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    pub max_items: usize,
    pub max_item_price: Option<Price>,
    pub max_total: Option<Price>,
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_items: 20,
            max_item_price: Some(Price::new(25_000)),
            max_total: Some(Price::new(100_000)),
        }
    }
}

/// Why an item was refused admission to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CartRejection {
    /// The ledger already marks this item for the current friend code.
    #[error("item is already marked {0} for this friend code")]
    Blocked(OwnershipStatus),
    /// The cart already holds an entry with this item id.
    #[error("item is already in the cart")]
    Duplicate,
    /// The cart is at its configured item count.
    #[error("cart is full ({max} items)")]
    CartFull { max: usize },
    /// The item price exceeds the per-item cap.
    #[error("item price exceeds the per-item limit of {max} coins")]
    ItemTooExpensive { max: Price },
    /// Adding the item would push the cart total past its cap.
    #[error("cart total would exceed the limit of {max} coins")]
    TotalExceeded { max: Price },
}

/// A single cart line.
///
/// Quantity is fixed at 1; the field exists for wire compatibility with the
/// frontend cart shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub item_id: ItemId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "preco")]
    pub price: Price,
    pub quantity: u32,
}

impl CartEntry {
    fn from_item(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price,
            quantity: 1,
        }
    }
}

/// The session cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of cart lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the cart holds an entry for `id`.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.iter().any(|entry| &entry.item_id == id)
    }

    /// Sum of all entry prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(|entry| entry.price).sum()
    }

    /// Item ids in cart order, for the upstream gift request.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|entry| entry.item_id.clone()).collect()
    }

    /// Check whether `item` would be admitted, without mutating the cart.
    ///
    /// The ledger gate runs before every numeric check; after it the checks
    /// run in the order used for user-facing messaging: duplicate id, item
    /// count, per-item price (inclusive boundary), cart total (inclusive).
    ///
    /// # Errors
    ///
    /// Returns the first failing [`CartRejection`].
    pub fn can_add(
        &self,
        item: &Item,
        blocked: Option<OwnershipStatus>,
        limits: &CartLimits,
    ) -> Result<(), CartRejection> {
        if let Some(status) = blocked {
            return Err(CartRejection::Blocked(status));
        }
        if self.contains(&item.id) {
            return Err(CartRejection::Duplicate);
        }
        if self.entries.len() >= limits.max_items {
            return Err(CartRejection::CartFull {
                max: limits.max_items,
            });
        }
        if let Some(max) = limits.max_item_price
            && item.price > max
        {
            return Err(CartRejection::ItemTooExpensive { max });
        }
        if let Some(max) = limits.max_total
            && self.total().saturating_add(item.price) > max
        {
            return Err(CartRejection::TotalExceeded { max });
        }
        Ok(())
    }

    /// Admit `item`, appending an entry with quantity 1.
    ///
    /// No partial mutation happens on rejection.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`CartRejection`].
    pub fn add(
        &mut self,
        item: &Item,
        blocked: Option<OwnershipStatus>,
        limits: &CartLimits,
    ) -> Result<(), CartRejection> {
        self.can_add(item, blocked, limits)?;
        self.entries.push(CartEntry::from_item(item));
        Ok(())
    }

    /// Remove the entry for `id`; a no-op when absent.
    pub fn remove(&mut self, id: &ItemId) {
        self.entries.retain(|entry| &entry.item_id != id);
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
