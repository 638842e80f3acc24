//! Ownership ledger repository.
//!
//! Maps `(friend_code, item_id)` to a terminal gift outcome so future
//! sessions can pre-block items in the catalog view.
//!
//! Availability beats consistency here: when the backing store is
//! unconfigured or unreachable, reads return an empty list and writes are
//! silent no-ops. Browsing and sending proceed as if nothing were blocked.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use avkn_gifts_core::{FriendCode, ItemId, OwnershipStatus};

use super::RepositoryError;

/// A row of the `user_items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub friend_code: FriendCode,
    pub item_id: ItemId,
    pub item_name: String,
    pub status: OwnershipStatus,
    pub created_at: DateTime<Utc>,
}

/// Repository for the ownership ledger.
pub struct OwnershipLedger<'a> {
    pool: Option<&'a PgPool>,
}

impl<'a> OwnershipLedger<'a> {
    /// Create a new ledger repository over an optional pool.
    #[must_use]
    pub const fn new(pool: Option<&'a PgPool>) -> Self {
        Self { pool }
    }

    /// All ledger records for a friend code.
    ///
    /// Returns an empty list when the store is unconfigured or unreachable.
    pub async fn get_items(&self, friend_code: &FriendCode) -> Vec<OwnershipRecord> {
        let Some(pool) = self.pool else {
            return Vec::new();
        };

        match Self::fetch(pool, friend_code).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    friend_code = %friend_code,
                    "Ledger read failed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Upsert a terminal status for `(friend_code, item_id)`.
    ///
    /// Idempotent: a repeated call with the same key overwrites the stored
    /// name and status, never conflicts. Silent no-op when the store is
    /// unavailable.
    pub async fn mark_status(
        &self,
        friend_code: &FriendCode,
        item_id: &ItemId,
        item_name: &str,
        status: OwnershipStatus,
    ) {
        let Some(pool) = self.pool else {
            return;
        };

        let result = sqlx::query(
            r"
            INSERT INTO user_items (friend_code, item_id, item_name, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (friend_code, item_id)
            DO UPDATE SET item_name = EXCLUDED.item_name, status = EXCLUDED.status
            ",
        )
        .bind(friend_code.as_str())
        .bind(item_id.as_str())
        .bind(item_name)
        .bind(status.as_str())
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(item_id = %item_id, status = %status, "Ledger status recorded");
            }
            Err(e) => {
                tracing::warn!(error = %e, item_id = %item_id, "Ledger write failed, skipping");
            }
        }
    }

    async fn fetch(
        pool: &PgPool,
        friend_code: &FriendCode,
    ) -> Result<Vec<OwnershipRecord>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT friend_code, item_id, item_name, status, created_at
            FROM user_items
            WHERE friend_code = $1
            ORDER BY created_at
            ",
        )
        .bind(friend_code.as_str())
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let friend_raw: String = row.try_get("friend_code")?;
                let friend_code = FriendCode::parse(&friend_raw).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid friend code in database: {e}"))
                })?;

                let status_raw: String = row.try_get("status")?;
                let status: OwnershipStatus = status_raw.parse().map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
                })?;

                let item_id: String = row.try_get("item_id")?;

                Ok(OwnershipRecord {
                    friend_code,
                    item_id: ItemId::from(item_id),
                    item_name: row.try_get("item_name")?,
                    status,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
