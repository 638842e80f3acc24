//! Balance proxy route.
//!
//! A stateless relay: the upstream status and body pass through unchanged.
//! A transport failure synthesizes `500 {"error": "Erro ao consultar saldo"}`.
//! No retries, no caching, no validation of the key.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::avakin;
use crate::error::AppError;
use crate::state::AppState;

/// Relay a balance lookup to the external gift API.
#[instrument(skip_all)]
pub async fn proxy(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.avakin().get_balance(&key).await {
        Ok(relayed) => super::relay(relayed),
        Err(e) => AppError::upstream(avakin::BALANCE_ERROR, e).into_response(),
    }
}
