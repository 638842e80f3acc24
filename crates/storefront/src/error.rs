//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding with a JSON `{"error": ...}` body. All route
//! handlers return `Result<T, AppError>`. Nothing here is fatal to the
//! process: every error is recovered at the HTTP boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::avakin::AvakinError;
use crate::cart::CartRejection;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Transport failure reaching the external gift API.
    ///
    /// Carries the fixed user-facing message of the affected endpoint; the
    /// underlying cause is logged, never exposed.
    #[error("upstream transport failure: {message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: AvakinError,
    },

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The cart admission policy refused the item.
    #[error("{0}")]
    CartRejected(#[from] CartRejection),

    /// A gift send is already pending for this session.
    #[error("a gift send is already in progress")]
    SendInProgress,

    /// Gift sending is not currently permitted for this session.
    #[error("{0}")]
    SendNotAllowed(String),
}

impl AppError {
    /// Wrap an external-API transport failure with its fixed user-facing
    /// message.
    #[must_use]
    pub const fn upstream(message: &'static str, source: AvakinError) -> Self {
        Self::Upstream { message, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side errors to Sentry
        if matches!(self, Self::Upstream { .. } | Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Upstream { .. } | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CartRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SendInProgress => StatusCode::CONFLICT,
            Self::SendNotAllowed(_) => StatusCode::PRECONDITION_FAILED,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Upstream { message, .. } => (*message).to_string(),
            Self::Session(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use avkn_gifts_core::Price;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("item hat_01".to_string());
        assert_eq!(err.to_string(), "Not found: item hat_01");

        let err = AppError::CartRejected(CartRejection::ItemTooExpensive {
            max: Price::new(25_000),
        });
        assert_eq!(
            err.to_string(),
            "item price exceeds the per-item limit of 25000 coins"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::CartRejected(CartRejection::Duplicate)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(get_status(AppError::SendInProgress), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AppError::SendNotAllowed("x".to_string())),
            StatusCode::PRECONDITION_FAILED
        );
    }
}
