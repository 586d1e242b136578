//! Hallowmart Backend - store service binary.
//!
//! Serves the RPC surface on port 8001: user lookup and identity binding,
//! the product catalog, cart mutation, and checkout. Persists everything in
//! `PostgreSQL` as JSON documents, runs its schema migration and seeds the
//! product catalog (idempotently) at startup.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hallowmart_backend::config::BackendConfig;
use hallowmart_backend::routes;
use hallowmart_backend::service::StoreService;
use hallowmart_backend::store::PgDatastore;
use hallowmart_backend::catalog;

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info for our crates
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hallowmart_backend=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BackendConfig::from_env().expect("Failed to load configuration");

    let store = PgDatastore::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database pool created");

    store.migrate().await.expect("Failed to run migrations");

    let created = catalog::seed_from_file(&store, &config.catalog_path)
        .await
        .expect("Failed to seed product catalog");
    tracing::info!(created, catalog = %config.catalog_path.display(), "catalog seeded");

    let app = routes::router(StoreService::new(store)).layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    tracing::info!("backend listening on {}", addr);

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
