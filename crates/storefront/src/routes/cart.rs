//! Cart route handlers.
//!
//! The cart is session state: every mutation loads the session, applies the
//! admission policy, and saves the result back.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use avkn_gifts_core::{ItemId, Price};

use crate::cart::{Cart, CartEntry, CartLimits};
use crate::error::{AppError, Result};
use crate::models::session::GiftSession;
use crate::services;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub total: Price,
    pub count: usize,
    pub max_items: usize,
    /// Coins left before the cart-total cap, when one is configured.
    pub remaining_value: Option<Price>,
}

impl CartView {
    /// Build the view for a cart under the given caps.
    #[must_use]
    pub fn build(cart: &Cart, limits: &CartLimits) -> Self {
        let total = cart.total();
        Self {
            items: cart.entries().to_vec(),
            total,
            count: cart.len(),
            max_items: limits.max_items,
            remaining_value: limits
                .max_total
                .map(|max| Price::new(max.as_coins().saturating_sub(total.as_coins()))),
        }
    }
}

/// Request body for `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub item_id: ItemId,
}

/// Return the current cart.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let gift_session = GiftSession::load(&session).await;
    Json(CartView::build(&gift_session.cart, state.cart_limits()))
}

/// Add an item to the cart through the admission policy.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let item = state
        .catalog()
        .get(&body.item_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("item {}", body.item_id)))?;

    let mut gift_session = GiftSession::load(&session).await;
    let blocked = gift_session.blocked_status(&item.id);
    gift_session.cart.add(&item, blocked, state.cart_limits())?;
    gift_session.save(&session).await?;

    Ok(Json(CartView::build(&gift_session.cart, state.cart_limits())))
}

/// Remove an item from the cart; a no-op when absent.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut gift_session = GiftSession::load(&session).await;
    gift_session.cart.remove(&ItemId::from(item_id));
    gift_session.save(&session).await?;

    Ok(Json(CartView::build(&gift_session.cart, state.cart_limits())))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut gift_session = GiftSession::load(&session).await;
    gift_session.cart.clear();
    gift_session.save(&session).await?;

    Ok(Json(CartView::build(&gift_session.cart, state.cart_limits())))
}

/// Send the cart as gifts to the session's friend code.
///
/// Delegates to the orchestration service; the upstream response body is
/// relayed unchanged.
#[instrument(skip_all)]
pub async fn send(State(state): State<AppState>, session: Session) -> Result<Response> {
    let relayed = services::gift::send_gifts(&state, &session).await?;
    Ok(super::relay(relayed))
}
