//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::avakin::AvakinClient;
use crate::cart::CartLimits;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::db::ownership::OwnershipLedger;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the external API client, configuration, and the optional
/// database pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    avakin: AvakinClient,
    pool: Option<PgPool>,
    cart_limits: CartLimits,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `cart_limits` are the resolved caps (environment defaults plus any
    /// `app_settings` overrides read at startup).
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        pool: Option<PgPool>,
        cart_limits: CartLimits,
    ) -> Self {
        let avakin = AvakinClient::new(&config.avakin);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                avakin,
                pool,
                cart_limits,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the item catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the external gift API client.
    #[must_use]
    pub fn avakin(&self) -> &AvakinClient {
        &self.inner.avakin
    }

    /// Get a reference to the database connection pool, if configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Build an ownership-ledger repository over the current pool.
    #[must_use]
    pub fn ledger(&self) -> OwnershipLedger<'_> {
        OwnershipLedger::new(self.pool())
    }

    /// Get the resolved cart admission caps.
    #[must_use]
    pub fn cart_limits(&self) -> &CartLimits {
        &self.inner.cart_limits
    }

    /// Get the listing page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.inner.config.page_size
    }
}
