//! Gift send orchestration.
//!
//! Coordinates the session state machine around a single upstream send:
//! the send guards (valid key, friend code, non-empty cart), the per-session
//! busy flag, ledger writes for terminal outcomes, cart clearing on success,
//! and the cached balance refresh.

use tower_sessions::Session;

use avkn_gifts_core::FriendCode;

use crate::avakin::{self, GiftOutcome, GiftRequest, GiftResponse, Relayed};
use crate::error::{AppError, Result};
use crate::models::session::{GiftSession, keys};
use crate::state::AppState;

/// Send the session cart to the session friend code, once.
///
/// The upstream response is returned for verbatim relay; its typed view
/// drives the side effects below. At most one send may be in flight per
/// session, enforced by a busy flag (the driving client is single-threaded;
/// no lock is needed or wanted).
///
/// # Errors
///
/// - [`AppError::SendNotAllowed`] when a guard fails
/// - [`AppError::SendInProgress`] while another send is pending
/// - [`AppError::Upstream`] on transport failure
pub async fn send_gifts(state: &AppState, session: &Session) -> Result<Relayed> {
    let mut gift_session = GiftSession::load(session).await;

    let Some(key) = gift_session.key.clone().filter(|_| gift_session.key_valid) else {
        return Err(AppError::SendNotAllowed(
            "a valid key is required".to_string(),
        ));
    };
    let Some(friend_code) = gift_session.friend_code.clone() else {
        return Err(AppError::SendNotAllowed(
            "a friend code is required".to_string(),
        ));
    };
    if gift_session.cart.is_empty() {
        return Err(AppError::SendNotAllowed("the cart is empty".to_string()));
    }

    let pending = session
        .get::<bool>(keys::GIFT_PENDING)
        .await
        .ok()
        .flatten()
        .unwrap_or(false);
    if pending {
        return Err(AppError::SendInProgress);
    }
    session.insert(keys::GIFT_PENDING, true).await?;
    // Persist the busy flag before the (slow) upstream call.
    if let Err(e) = session.save().await {
        tracing::warn!(error = %e, "Failed to persist busy flag eagerly");
    }

    let request = GiftRequest {
        friend_code: friend_code.as_str().to_owned(),
        items: gift_session.cart.item_ids(),
        key,
    };
    tracing::info!(
        friend_code = %friend_code,
        items = request.items.len(),
        "Sending gifts"
    );

    let result = state.avakin().send_gift(&request).await;
    session.insert(keys::GIFT_PENDING, false).await?;

    let relayed = match result {
        Ok(relayed) => relayed,
        Err(e) => return Err(AppError::upstream(avakin::GIFT_ERROR, e)),
    };

    if let Some(response) = relayed.parse::<GiftResponse>() {
        apply_response(state, &mut gift_session, &friend_code, &response).await;
    }
    gift_session.save(session).await?;

    Ok(relayed)
}

/// Apply a gift response to the session and the ownership ledger.
async fn apply_response(
    state: &AppState,
    gift_session: &mut GiftSession,
    friend_code: &FriendCode,
    response: &GiftResponse,
) {
    // The cached balance follows the response whenever it reports one.
    if let Some(balance) = response.remaining_balance() {
        gift_session.balance = Some(balance);
    }

    if response.rate_limited() {
        // A sender rate limit poisons the whole response: none of its
        // per-item results may reach the ledger or the blocked cache.
        tracing::info!(friend_code = %friend_code, "Gift response rate limited, no ledger writes");
    } else {
        let ledger = state.ledger();
        for item in response.results() {
            let Some(item_id) = item.item_id.clone() else {
                continue;
            };
            if let GiftOutcome::Terminal(status) = item.outcome() {
                ledger
                    .mark_status(friend_code, &item_id, &item.item_name, status)
                    .await;
                gift_session.add_blocked(item_id, status);
            }
        }
    }

    if response.success {
        gift_session.cart.clear();
    }
}
