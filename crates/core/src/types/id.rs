//! Newtype ID for type-safe item references.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog item.
///
/// Item ids are opaque strings assigned by the external game catalog. They
/// are never parsed or interpreted locally, only compared and forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new item id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_roundtrip() {
        let id = ItemId::new("hat_2041");
        assert_eq!(id.as_str(), "hat_2041");
        assert_eq!(id.to_string(), "hat_2041");
    }

    #[test]
    fn test_item_id_equality() {
        assert_eq!(ItemId::from("a"), ItemId::new("a"));
        assert_ne!(ItemId::from("a"), ItemId::from("b"));
    }
}
