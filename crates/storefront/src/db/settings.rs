//! Read-only application settings.
//!
//! The `app_settings` table is a key/value store consumed once at startup
//! to configure the cart admission caps. Absent keys and an unreachable
//! store fall back to the configured defaults.

use sqlx::{PgPool, Row};

use avkn_gifts_core::Price;

use crate::cart::CartLimits;

const KEY_MAX_ITEM_PRICE: &str = "MAX_ITEM_PRICE";
const KEY_MAX_CART_ITEMS: &str = "MAX_CART_ITEMS";
const KEY_MAX_CART_TOTAL: &str = "MAX_CART_TOTAL";

/// Load cart limits, applying any overrides present in `app_settings`.
pub async fn load_cart_limits(pool: Option<&PgPool>, defaults: CartLimits) -> CartLimits {
    let Some(pool) = pool else {
        return defaults;
    };

    let settings = match fetch_all(pool).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "Settings read failed, using default cart limits");
            return defaults;
        }
    };

    let mut limits = defaults;
    for (key, value) in settings {
        match key.as_str() {
            KEY_MAX_CART_ITEMS => {
                if let Ok(n) = value.parse::<usize>() {
                    limits.max_items = n;
                }
            }
            KEY_MAX_ITEM_PRICE => {
                if let Ok(n) = value.parse::<u64>() {
                    limits.max_item_price = Some(Price::new(n));
                }
            }
            KEY_MAX_CART_TOTAL => {
                if let Ok(n) = value.parse::<u64>() {
                    limits.max_total = Some(Price::new(n));
                }
            }
            _ => {}
        }
    }

    tracing::info!(
        max_items = limits.max_items,
        max_item_price = ?limits.max_item_price,
        max_total = ?limits.max_total,
        "Cart limits resolved"
    );
    limits
}

async fn fetch_all(pool: &PgPool) -> Result<Vec<(String, String)>, sqlx::Error> {
    let rows = sqlx::query("SELECT key, value FROM app_settings")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| Ok((row.try_get("key")?, row.try_get("value")?)))
        .collect()
}
