//! Session-scoped storefront state.
//!
//! This replaces the original global store: key state, friend code, the
//! cached blocked-item list, and the cart all live in one serialized value
//! keyed by the session cookie, loaded and saved explicitly by the
//! orchestration layer.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use avkn_gifts_core::{FriendCode, GiftKey, ItemId, OwnershipStatus};

use crate::cart::Cart;

/// Session keys.
pub mod keys {
    /// Key for the serialized [`GiftSession`](super::GiftSession).
    pub const GIFT_SESSION: &str = "gift_session";

    /// Busy marker for an in-flight gift send.
    pub const GIFT_PENDING: &str = "gift_pending";
}

/// An item pre-blocked for the current friend code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedItem {
    pub item_id: ItemId,
    pub status: OwnershipStatus,
}

/// Per-session storefront state.
///
/// Key state and friend-code state advance independently; the cart is
/// always live. Gift sending requires all three (valid key, friend code
/// set, non-empty cart).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftSession {
    /// The user-supplied key, kept even when invalid so clients can
    /// re-display it.
    pub key: Option<GiftKey>,
    /// Whether the last balance check confirmed the key active.
    pub key_valid: bool,
    /// Balance cached from the last balance check or gift response.
    pub balance: Option<i64>,
    pub friend_code: Option<FriendCode>,
    /// Ledger records cached when the friend code was set, plus terminal
    /// outcomes observed since.
    pub blocked_items: Vec<BlockedItem>,
    pub cart: Cart,
}

impl GiftSession {
    /// Load the session state, falling back to a fresh default.
    pub async fn load(session: &Session) -> Self {
        session
            .get::<Self>(keys::GIFT_SESSION)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Persist the session state.
    ///
    /// # Errors
    ///
    /// Returns the session-store error when persistence fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::GIFT_SESSION, self).await
    }

    /// Ledger status for `id` under the current friend code, if any.
    #[must_use]
    pub fn blocked_status(&self, id: &ItemId) -> Option<OwnershipStatus> {
        self.blocked_items
            .iter()
            .find(|blocked| &blocked.item_id == id)
            .map(|blocked| blocked.status)
    }

    /// Record a newly observed terminal outcome in the cached blocked list.
    pub fn add_blocked(&mut self, item_id: ItemId, status: OwnershipStatus) {
        if !self.blocked_items.iter().any(|b| b.item_id == item_id) {
            self.blocked_items.push(BlockedItem { item_id, status });
        }
    }

    /// Whether a gift send is currently permitted.
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.key_valid && self.friend_code.is_some() && !self.cart.is_empty()
    }

    /// Clear key state on logout.
    pub fn clear_key(&mut self) {
        self.key = None;
        self.key_valid = false;
        self.balance = None;
    }

    /// Clear the friend code and the cached blocked list.
    pub fn clear_friend_code(&mut self) {
        self.friend_code = None;
        self.blocked_items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_can_send_requires_all_three() {
        let mut state = GiftSession::default();
        assert!(!state.can_send());

        state.key = Some(GiftKey::new("ABC123"));
        state.key_valid = true;
        assert!(!state.can_send());

        state.friend_code = Some(FriendCode::parse("ABC123").unwrap());
        assert!(!state.can_send());

        let item = crate::catalog::Item {
            id: ItemId::from("a"),
            name: "A".to_owned(),
            category: "roupas".to_owned(),
            subcategory: "chapeus".to_owned(),
            brand: "Nova".to_owned(),
            price: avkn_gifts_core::Price::new(100),
            release_date: String::new(),
            unreleased: false,
            image: String::new(),
        };
        state
            .cart
            .add(&item, None, &crate::cart::CartLimits::default())
            .unwrap();
        assert!(state.can_send());
    }

    #[test]
    fn test_add_blocked_is_idempotent() {
        let mut state = GiftSession::default();
        state.add_blocked(ItemId::from("a"), OwnershipStatus::Owned);
        state.add_blocked(ItemId::from("a"), OwnershipStatus::Owned);
        assert_eq!(state.blocked_items.len(), 1);
        assert_eq!(
            state.blocked_status(&ItemId::from("a")),
            Some(OwnershipStatus::Owned)
        );
    }

    #[test]
    fn test_clear_key_resets_validity_and_balance() {
        let mut state = GiftSession {
            key: Some(GiftKey::new("ABC123")),
            key_valid: true,
            balance: Some(5_000),
            ..GiftSession::default()
        };
        state.clear_key();
        assert!(state.key.is_none());
        assert!(!state.key_valid);
        assert!(state.balance.is_none());
    }
}
