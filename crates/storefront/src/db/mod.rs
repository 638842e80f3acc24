//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `user_items` - per-friend-code ownership ledger, unique on
//!   `(friend_code, item_id)`
//! - `app_settings` - read-only key/value configuration consumed at startup
//! - tower-sessions storage (schema managed by the session store itself)
//!
//! The database is OPTIONAL. Without a configured URL the service still
//! runs: the ledger degrades to empty, settings fall back to defaults, and
//! sessions live in memory. Catalog browsing and gift sending never block
//! on ledger availability.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p avkn-gifts-cli -- migrate
//! ```

pub mod ownership;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
