//! Session state handlers.
//!
//! The session state machine: key unset -> checking -> valid | invalid, and
//! independently friend code unset -> set. Every handler loads the session
//! state, mutates it, and saves it back explicitly.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use avkn_gifts_core::{FriendCode, GiftKey};

use crate::avakin::{self, BalanceResponse};
use crate::error::{AppError, Result};
use crate::models::session::{BlockedItem, GiftSession};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Request body for `POST /api/session/key`.
#[derive(Debug, Deserialize)]
pub struct SetKeyRequest {
    pub key: String,
}

/// Key validation outcome.
#[derive(Debug, Serialize)]
pub struct KeyStatus {
    pub valid: bool,
    #[serde(rename = "saldo")]
    pub balance: Option<i64>,
}

/// Request body for `PUT /api/session/friend-code`.
#[derive(Debug, Deserialize)]
pub struct SetFriendCodeRequest {
    pub friend_code: String,
}

/// Friend-code state after a successful set.
#[derive(Debug, Serialize)]
pub struct FriendCodeView {
    pub friend_code: FriendCode,
    pub blocked_items: Vec<BlockedItem>,
}

/// Session snapshot returned by `GET /api/session`.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub key_set: bool,
    pub key_valid: bool,
    #[serde(rename = "saldo")]
    pub balance: Option<i64>,
    pub friend_code: Option<FriendCode>,
    pub blocked_items: Vec<BlockedItem>,
    pub cart: CartView,
    /// Whether a gift send is currently permitted (the send-button state).
    pub can_send: bool,
}

/// Return the current session snapshot.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<SessionView> {
    let gift_session = GiftSession::load(&session).await;

    Json(SessionView {
        key_set: gift_session.key.is_some(),
        key_valid: gift_session.key_valid,
        balance: gift_session.balance,
        friend_code: gift_session.friend_code.clone(),
        blocked_items: gift_session.blocked_items.clone(),
        can_send: gift_session.can_send(),
        cart: CartView::build(&gift_session.cart, state.cart_limits()),
    })
}

/// Validate a key through the balance endpoint and store the outcome.
///
/// An inactive or unknown key is never an error: the key is stored with
/// `valid = false` and a null balance so the client can re-display it.
#[instrument(skip_all)]
pub async fn set_key(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SetKeyRequest>,
) -> Result<Json<KeyStatus>> {
    let key = body.key.trim();
    if key.is_empty() {
        return Err(AppError::BadRequest("key cannot be empty".to_string()));
    }

    let relayed = state
        .avakin()
        .get_balance(key)
        .await
        .map_err(|e| AppError::upstream(avakin::BALANCE_ERROR, e))?;

    let mut gift_session = GiftSession::load(&session).await;
    gift_session.key = Some(GiftKey::new(key));

    let status = match relayed.parse::<BalanceResponse>() {
        Some(balance) if relayed.is_success() && balance.active => {
            gift_session.key_valid = true;
            gift_session.balance = Some(balance.balance);
            KeyStatus {
                valid: true,
                balance: Some(balance.balance),
            }
        }
        _ => {
            // Invalid, inactive, or unparseable: validity off, balance null.
            gift_session.key_valid = false;
            gift_session.balance = None;
            KeyStatus {
                valid: false,
                balance: None,
            }
        }
    };

    gift_session.save(&session).await?;
    Ok(Json(status))
}

/// Clear key state.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    let mut gift_session = GiftSession::load(&session).await;
    gift_session.clear_key();
    gift_session.save(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set the friend code and cache its ledger records.
#[instrument(skip_all)]
pub async fn set_friend_code(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SetFriendCodeRequest>,
) -> Result<Json<FriendCodeView>> {
    let friend_code =
        FriendCode::parse(&body.friend_code).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Bulk-read the ledger so already-owned items pre-block in the catalog.
    let records = state.ledger().get_items(&friend_code).await;
    let blocked_items: Vec<BlockedItem> = records
        .into_iter()
        .map(|record| BlockedItem {
            item_id: record.item_id,
            status: record.status,
        })
        .collect();

    let mut gift_session = GiftSession::load(&session).await;
    gift_session.friend_code = Some(friend_code.clone());
    gift_session.blocked_items = blocked_items.clone();
    gift_session.save(&session).await?;

    tracing::info!(
        friend_code = %friend_code,
        blocked = blocked_items.len(),
        "Friend code set"
    );

    Ok(Json(FriendCodeView {
        friend_code,
        blocked_items,
    }))
}

/// Clear the friend code and the cached blocked list.
#[instrument(skip_all)]
pub async fn clear_friend_code(session: Session) -> Result<StatusCode> {
    let mut gift_session = GiftSession::load(&session).await;
    gift_session.clear_friend_code();
    gift_session.save(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
