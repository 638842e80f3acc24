//! Middleware configuration.

pub mod session;

pub use session::{SESSION_COOKIE_NAME, memory_session_layer, postgres_session_layer};
