//! HTTP route handlers for the web frontend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (catalog + purchase ticker)
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Redirect to Google OAuth
//! GET  /oauth2callback         - Handle OAuth callback
//! GET  /logout                 - Clear the session
//!
//! # Users
//! GET  /u/{id}                 - Profile page with purchase history
//!
//! # Cart
//! GET  /cart/u/{id}            - Cart page
//! GET  /addproduct/{id}/{pid}  - Add one unit, redirect home
//! GET  /checkout/u/{id}        - Checkout, redirect to profile
//!
//! # Static assets
//! GET  /static/*               - Catalog images and other assets
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod profile;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_sessions::Session;

use hallowmart_core::rpc::UserView;

use crate::error::Result;
use crate::session::keys;
use crate::state::AppState;

/// Create the web frontend router, serving static assets from `static_dir`.
pub fn routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/login", get(auth::login))
        .route("/oauth2callback", get(auth::callback))
        .route("/logout", get(auth::logout))
        .route("/u/{id}", get(profile::show))
        .route("/cart/u/{id}", get(cart::show))
        .route("/addproduct/{id}/{pid}", get(cart::add_product))
        .route("/checkout/u/{id}", get(cart::checkout))
}

async fn health() -> &'static str {
    "ok"
}

/// Resolve the signed-in user from the session, if any.
///
/// A stale session (a user id the backend no longer resolves) is treated
/// as signed out and the stale id is dropped from the session.
pub(crate) async fn current_user(
    state: &AppState,
    session: &Session,
) -> Result<Option<UserView>> {
    let Some(user_id) = session.get::<String>(keys::USER_ID).await? else {
        return Ok(None);
    };

    let response = state.backend().get_user(&user_id).await?;
    if !response.found {
        let _ = session.remove::<String>(keys::USER_ID).await;
    }
    Ok(response.user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::config::WebConfig;

    use super::*;

    fn app() -> Router {
        let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");
        let config = WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_owned(),
            backend_url: "http://localhost:8001".to_owned(),
            session_secret: SecretString::from("x".repeat(64)),
            google_client_id: "client-id".to_owned(),
            google_client_secret: SecretString::from("client-secret"),
            static_dir: static_dir.clone(),
        };
        routes(&static_dir).with_state(AppState::new(config))
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catalog_images_are_served() {
        let response = app()
            .oneshot(
                Request::get("/static/img/pumpkin.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_static_asset_is_not_found() {
        let response = app()
            .oneshot(
                Request::get("/static/img/nonexistent.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
