//! Hallowmart Web - public web frontend binary.
//!
//! Serves the storefront pages on port 8000: the product catalog, Google
//! OAuth login, profile and cart pages, and the checkout link. Talks to
//! the backend store service for everything persistent; keeps only the
//! session cookie itself.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hallowmart_web::config::WebConfig;
use hallowmart_web::routes;
use hallowmart_web::session;
use hallowmart_web::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info for our crates
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hallowmart_web=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WebConfig::from_env().expect("Failed to load configuration");

    let session_layer =
        session::create_session_layer(&config).expect("Failed to build session layer");

    let state = AppState::new(config);
    let addr = state.config().socket_addr();
    let static_dir = state.config().static_dir.clone();

    let app = routes::routes(&static_dir)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("web frontend listening on {}", addr);

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
