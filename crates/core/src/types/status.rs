//! Ownership status enum.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ledger status of an item for a given friend code.
///
/// Only definitive, terminal gift outcomes are ever recorded; transient
/// failures (rate limits, transport errors) never produce a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipStatus {
    /// The destination account already owns the item.
    Owned,
    /// The external game refuses to deliver this item to the account.
    PurchaseNotAllowed,
}

impl OwnershipStatus {
    /// Returns the snake_case wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::PurchaseNotAllowed => "purchase_not_allowed",
        }
    }
}

impl fmt::Display for OwnershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owned" => Ok(Self::Owned),
            "purchase_not_allowed" => Ok(Self::PurchaseNotAllowed),
            _ => Err(format!("invalid ownership status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        for status in [OwnershipStatus::Owned, OwnershipStatus::PurchaseNotAllowed] {
            let parsed: OwnershipStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("blocked".parse::<OwnershipStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OwnershipStatus::PurchaseNotAllowed).unwrap();
        assert_eq!(json, "\"purchase_not_allowed\"");
    }
}
