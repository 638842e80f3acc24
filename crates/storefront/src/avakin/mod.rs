//! Client for the external Avakin gift API.
//!
//! # Architecture
//!
//! The external API owns all gift domain logic: balance deduction, ownership
//! checks, recipient rate limits. This module is deliberately a thin relay:
//!
//! - upstream status and body pass through unchanged (unknown fields
//!   included), so the browser sees exactly what the API returned;
//! - typed views of the bodies are parsed separately, only to drive the
//!   orchestration layer (ledger writes, cart clearing, cached balance);
//! - no retries, no caching, transport-default timeouts.
//!
//! # Example
//!
//! ```rust,ignore
//! use avkn_gifts_storefront::avakin::AvakinClient;
//!
//! let client = AvakinClient::new(&config.avakin);
//! let relayed = client.get_balance("ABC123").await?;
//! if let Some(balance) = relayed.parse::<BalanceResponse>() {
//!     println!("{} coins (active: {})", balance.balance, balance.active);
//! }
//! ```

mod client;
pub mod types;

pub use client::{AvakinClient, Relayed};
pub use types::*;

use thiserror::Error;

/// Fixed user-facing message for a failed balance relay.
pub const BALANCE_ERROR: &str = "Erro ao consultar saldo";

/// Fixed user-facing message for a failed gift relay.
pub const GIFT_ERROR: &str = "Erro ao enviar presentes";

/// Errors that can occur when reaching the external gift API.
///
/// Upstream HTTP error *statuses* are not errors here - they are relayed
/// verbatim. Only transport-level failures surface as [`AvakinError`].
#[derive(Debug, Error)]
pub enum AvakinError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The outgoing request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
