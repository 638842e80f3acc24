//! AvknGifts Storefront - Public gift storefront service.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API consumed by the browser frontend
//! - Static item catalog loaded from a JSON file at startup
//! - Two thin proxy routes relaying to the external Avakin gift API
//! - `PostgreSQL` for the ownership ledger, settings, and sessions
//!
//! # Degraded mode
//!
//! The database is optional. Without one the service still serves the
//! catalog and relays gifts; the ownership ledger reads as empty, settings
//! fall back to defaults, and sessions live in memory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avkn_gifts_storefront::catalog::Catalog;
use avkn_gifts_storefront::config::StorefrontConfig;
use avkn_gifts_storefront::state::AppState;
use avkn_gifts_storefront::{db, middleware, routes};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "avkn_gifts_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Load the item catalog; the service is useless without it
    let catalog = Catalog::load(&config.catalog_path).expect("Failed to load item catalog");

    // Connect to the database when one is configured
    let pool = match &config.database_url {
        Some(url) => match db::create_pool(url).await {
            Ok(pool) => {
                tracing::info!("Database pool created");
                Some(pool)
            }
            Err(e) => {
                // Degrade rather than die: the ledger is optional by design
                tracing::warn!(error = %e, "Database unreachable, running without ledger");
                None
            }
        },
        None => {
            tracing::info!("No database configured, running without ledger");
            None
        }
    };

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p avkn-gifts-cli -- migrate

    // Resolve cart limits: env defaults overridden by app_settings
    let cart_limits = db::settings::load_cart_limits(pool.as_ref(), config.cart_limits).await;

    // Build application state and router
    let state = AppState::new(config.clone(), catalog, pool, cart_limits);
    let app = routes::app(state.clone());

    // Session layer: Postgres-backed when possible, in-memory otherwise
    let app = match state.pool() {
        Some(pool) => app.layer(middleware::postgres_session_layer(pool, &config).await),
        None => app.layer(middleware::memory_session_layer(&config)),
    };

    let app = app
        // The browser frontend is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
