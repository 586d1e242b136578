//! Google OAuth route handlers.
//!
//! Handles the login flow:
//! - Login: Redirects to Google's consent page
//! - Callback: Validates state, exchanges the code, binds the identity
//!   to a store user, and records the user id in the session
//! - Logout: Drops the session

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::session::keys;
use crate::state::AppState;

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}

/// Initiate Google OAuth login.
///
/// Generates a state parameter, stores it in the session, and redirects
/// to Google's consent page.
///
/// # Route
///
/// `GET /login`
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let oauth_state = generate_random_string(32);
    session.insert(keys::OAUTH_STATE, &oauth_state).await?;

    let redirect_uri = state.config().oauth_redirect_uri();
    let auth_url = state
        .google()
        .authorization_url(&redirect_uri, &oauth_state);

    Ok(Redirect::to(&auth_url))
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for a
/// token, fetches the profile, and binds it to a store user.
///
/// # Route
///
/// `GET /oauth2callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    // Consent denied or other provider-side failure
    if let Some(error) = query.error {
        tracing::warn!(error, "Google OAuth error");
        return Ok(Redirect::to("/"));
    }

    let Some(code) = query.code else {
        return Err(AppError::BadRequest("missing authorization code".to_owned()));
    };
    let Some(returned_state) = query.state else {
        return Err(AppError::BadRequest("missing state parameter".to_owned()));
    };

    // Verify state parameter (CSRF protection)
    let stored_state: Option<String> = session.get(keys::OAUTH_STATE).await?;
    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("OAuth state mismatch");
        return Err(AppError::BadRequest("state mismatch".to_owned()));
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(keys::OAUTH_STATE).await;

    // Exchange the code, then look the visitor up at Google
    let redirect_uri = state.config().oauth_redirect_uri();
    let token = state.google().exchange_code(&code, &redirect_uri).await?;
    let profile = state.google().fetch_profile(&token).await?;

    // Create-or-fetch the store user bound to this identity
    let user = state.backend().authorize(&profile).await?;
    session.insert(keys::USER_ID, &user.id).await?;

    tracing::info!(user_id = %user.id, "user signed in");
    Ok(Redirect::to("/"))
}

/// Log out and drop the session.
///
/// # Route
///
/// `GET /logout`
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_has_requested_length() {
        assert_eq!(generate_random_string(32).len(), 32);
    }

    #[test]
    fn test_random_strings_differ() {
        assert_ne!(generate_random_string(32), generate_random_string(32));
    }

    #[test]
    fn test_random_string_is_alphanumeric() {
        let state = generate_random_string(256);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
