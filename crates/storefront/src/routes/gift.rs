//! Gift proxy route.
//!
//! A stateless relay of `{ friend_code, items, key }` to the external gift
//! API. The body is forwarded verbatim - shape validation is the external
//! API's job - and the response passes through unchanged. A transport
//! failure synthesizes `500 {"error": "Erro ao enviar presentes"}`.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::avakin;
use crate::error::AppError;
use crate::state::AppState;

/// Relay a gift request to the external gift API.
#[instrument(skip_all)]
pub async fn proxy(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> Response {
    match state.avakin().send_gift_raw(&body).await {
        Ok(relayed) => super::relay(relayed),
        Err(e) => AppError::upstream(avakin::GIFT_ERROR, e).into_response(),
    }
}
