//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /api/items                 - Filtered/sorted/paginated listing
//! GET  /api/items/facets          - Categories, subcategories, price bound
//!
//! # Session
//! GET    /api/session             - Session snapshot
//! POST   /api/session/key         - Validate a key via balance check
//! POST   /api/session/logout      - Clear key state
//! PUT    /api/session/friend-code - Set friend code, load blocked items
//! DELETE /api/session/friend-code - Clear friend code
//!
//! # Cart
//! GET    /api/cart                - Current cart
//! POST   /api/cart/items          - Add an item (admission policy)
//! DELETE /api/cart/items/{id}     - Remove an item
//! DELETE /api/cart                - Clear the cart
//! POST   /api/cart/send           - Orchestrated gift send
//!
//! # Proxies (stateless relays to the external gift API)
//! GET  /api/balance/{key}         - Balance passthrough
//! POST /api/gift                  - Gift passthrough
//! ```

pub mod balance;
pub mod cart;
pub mod gift;
pub mod items;
pub mod session;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::avakin::Relayed;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::index))
        .route("/facets", get(items::facets))
}

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(session::show))
        .route("/key", post(session::set_key))
        .route("/logout", post(session::logout))
        .route(
            "/friend-code",
            put(session::set_friend_code).delete(session::clear_friend_code),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{item_id}", delete(cart::remove))
        .route("/send", post(cart::send))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/items", item_routes())
        .nest("/api/session", session_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/balance/{key}", get(balance::proxy))
        .route("/api/gift", post(gift::proxy))
}

/// Assemble the full application router (health + API).
///
/// Session, CORS, and tracing layers are applied by the caller so tests can
/// swap the session store.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .with_state(state)
}

/// Turn a relayed upstream response into an HTTP response, status and body
/// unchanged.
pub(crate) fn relay(relayed: Relayed) -> Response {
    let status =
        StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(relayed.body)).into_response()
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity when one is configured; the degraded
/// (database-less) mode is always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.pool() {
        Some(pool) => match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::OK,
    }
}
