//! Wire types for the external gift API.
//!
//! Field names keep the upstream Portuguese JSON contract; Rust identifiers
//! are English. Response fields beyond the success flag are optional or
//! defaulted so a partially populated upstream body still validates - these
//! are tagged views over a duck-typed API, checked at the proxy boundary.

use serde::{Deserialize, Serialize};

use avkn_gifts_core::{GiftKey, ItemId, OwnershipStatus, Price};

/// Distinguished error tag for the sender-side daily rate limit.
///
/// This outcome is non-retryable for 24 hours but must never be mistaken
/// for a permanent block: it suppresses ledger writes entirely.
pub const RATE_LIMIT_SENDER: &str = "GiftResponseError_RateLimitSender";

/// Balance lookup response: `{ key, saldo, ativa }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub key: String,
    #[serde(rename = "saldo")]
    pub balance: i64,
    #[serde(rename = "ativa")]
    pub active: bool,
}

/// Gift send request: `{ friend_code, items, key }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftRequest {
    pub friend_code: String,
    pub items: Vec<ItemId>,
    pub key: GiftKey,
}

/// Gift send response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftResponse {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "mensagem", default)]
    pub message: String,
    /// Distinguished error tag (e.g. [`RATE_LIMIT_SENDER`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "detalhes", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<GiftDetails>,
}

/// Details block of a gift response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftDetails {
    /// Some revisions of the API nest the error tag here instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "preco_total", default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<u64>,
    #[serde(rename = "sucessos", default, skip_serializing_if = "Option::is_none")]
    pub successes: Option<u32>,
    #[serde(rename = "total_itens", default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u32>,
    #[serde(rename = "resultados", default)]
    pub results: Vec<GiftResultItem>,
    #[serde(
        rename = "saldo_chave_restante",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub key_balance_remaining: Option<i64>,
    #[serde(
        rename = "itens_solicitados",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub items_requested: Option<u32>,
}

/// Per-item outcome of a send attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftResultItem {
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(rename = "item_nome", default)]
    pub item_name: String,
    #[serde(rename = "preco", default)]
    pub price: Price,
    #[serde(default)]
    pub status_code: u16,
    #[serde(rename = "erro", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "ignorado", default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(
        rename = "conta_bloqueada",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub account_blocked: Option<bool>,
}

/// Classified per-item outcome.
///
/// Only terminal outcomes may be written to the ownership ledger; transient
/// outcomes (rate limits, transport issues, account selection failures)
/// must leave no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftOutcome {
    Terminal(OwnershipStatus),
    Transient,
}

impl GiftResultItem {
    /// Classify this result by error-tag/message substring, the way the
    /// upstream API distinguishes its outcomes.
    #[must_use]
    pub fn outcome(&self) -> GiftOutcome {
        if self.success {
            // Delivered: the recipient owns the item now.
            return GiftOutcome::Terminal(OwnershipStatus::Owned);
        }

        let text = format!(
            "{} {}",
            self.error.as_deref().unwrap_or_default(),
            self.message.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        if self.status_code == 429
            || text.contains("ratelimit")
            || text.contains("rate_limit")
            || text.contains("rate limit")
        {
            return GiftOutcome::Transient;
        }
        if text.contains("item is owned") || text.contains("ja possuido") {
            return GiftOutcome::Terminal(OwnershipStatus::Owned);
        }
        if text.contains("purchase not allowed") || text.contains("not reached level") {
            return GiftOutcome::Terminal(OwnershipStatus::PurchaseNotAllowed);
        }

        GiftOutcome::Transient
    }
}

impl GiftResponse {
    /// Whether the whole response is a sender rate-limit outcome.
    ///
    /// A rate-limited response suppresses every ledger write it might
    /// otherwise imply, including for per-item successes it contains.
    #[must_use]
    pub fn rate_limited(&self) -> bool {
        self.error.as_deref() == Some(RATE_LIMIT_SENDER)
            || self
                .details
                .as_ref()
                .is_some_and(|d| d.error.as_deref() == Some(RATE_LIMIT_SENDER))
    }

    /// Per-item results, empty when the details block is absent.
    #[must_use]
    pub fn results(&self) -> &[GiftResultItem] {
        self.details.as_ref().map_or(&[], |d| d.results.as_slice())
    }

    /// Remaining key balance reported by the response, if any.
    #[must_use]
    pub fn remaining_balance(&self) -> Option<i64> {
        self.details.as_ref().and_then(|d| d.key_balance_remaining)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn result_item(success: bool, error: Option<&str>, message: Option<&str>) -> GiftResultItem {
        GiftResultItem {
            item_id: Some(ItemId::from("hat_01")),
            item_name: "Neon Cap".to_owned(),
            price: Price::new(1_200),
            status_code: if success { 200 } else { 403 },
            error: error.map(str::to_owned),
            success,
            message: message.map(str::to_owned),
            skipped: None,
            account_blocked: None,
        }
    }

    #[test]
    fn test_success_is_terminal_owned() {
        assert_eq!(
            result_item(true, None, None).outcome(),
            GiftOutcome::Terminal(OwnershipStatus::Owned)
        );
    }

    #[test]
    fn test_item_is_owned_is_terminal() {
        assert_eq!(
            result_item(false, Some("item is owned"), None).outcome(),
            GiftOutcome::Terminal(OwnershipStatus::Owned)
        );
        // 409 variant carries the Portuguese message instead.
        let mut item = result_item(false, None, Some("Item ja possuido"));
        item.status_code = 409;
        assert_eq!(
            item.outcome(),
            GiftOutcome::Terminal(OwnershipStatus::Owned)
        );
    }

    #[test]
    fn test_level_requirement_is_purchase_not_allowed() {
        assert_eq!(
            result_item(
                false,
                Some("user has not reached level required"),
                Some("Usuario nao atingiu nivel necessario")
            )
            .outcome(),
            GiftOutcome::Terminal(OwnershipStatus::PurchaseNotAllowed)
        );
    }

    #[test]
    fn test_rate_limit_is_transient() {
        assert_eq!(
            result_item(false, Some(RATE_LIMIT_SENDER), None).outcome(),
            GiftOutcome::Transient
        );
        assert_eq!(
            result_item(false, Some("rate_limit_previous"), None).outcome(),
            GiftOutcome::Transient
        );

        let mut item = result_item(false, None, None);
        item.status_code = 429;
        assert_eq!(item.outcome(), GiftOutcome::Transient);
    }

    #[test]
    fn test_unknown_failures_are_transient() {
        assert_eq!(
            result_item(false, Some("login_failed"), Some("Falha ao fazer login")).outcome(),
            GiftOutcome::Transient
        );
        assert_eq!(
            result_item(false, None, None).outcome(),
            GiftOutcome::Transient
        );
    }

    #[test]
    fn test_response_rate_limited_top_level_and_nested() {
        let top: GiftResponse = serde_json::from_value(serde_json::json!({
            "sucesso": false,
            "mensagem": "0 de 2 presentes enviados com sucesso",
            "error": RATE_LIMIT_SENDER,
        }))
        .unwrap();
        assert!(top.rate_limited());

        let nested: GiftResponse = serde_json::from_value(serde_json::json!({
            "sucesso": false,
            "mensagem": "1 de 3 presentes enviados com sucesso",
            "detalhes": { "error": RATE_LIMIT_SENDER, "resultados": [] },
        }))
        .unwrap();
        assert!(nested.rate_limited());

        let clean: GiftResponse = serde_json::from_value(serde_json::json!({
            "sucesso": true,
            "mensagem": "2 de 2 presentes enviados com sucesso",
        }))
        .unwrap();
        assert!(!clean.rate_limited());
    }

    #[test]
    fn test_response_parses_full_details() {
        let response: GiftResponse = serde_json::from_value(serde_json::json!({
            "sucesso": true,
            "mensagem": "1 de 1 presentes enviados com sucesso",
            "detalhes": {
                "preco_total": 1200,
                "sucessos": 1,
                "total_itens": 1,
                "saldo_chave_restante": 48_800,
                "resultados": [{
                    "item_id": "hat_01",
                    "item_nome": "Neon Cap",
                    "preco": 1200,
                    "status_code": 200,
                    "sucesso": true,
                }],
            },
        }))
        .unwrap();

        assert_eq!(response.remaining_balance(), Some(48_800));
        assert_eq!(response.results().len(), 1);
        assert_eq!(
            response.results().first().unwrap().outcome(),
            GiftOutcome::Terminal(OwnershipStatus::Owned)
        );
    }
}
