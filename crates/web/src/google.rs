//! Google OAuth 2.0 / `OpenID` Connect client.
//!
//! # OAuth Flow
//!
//! 1. Generate the consent URL with `authorization_url()`
//! 2. Redirect the visitor to Google's login page
//! 3. Google redirects back to `/oauth2callback` with an authorization code
//! 4. Exchange the code for an access token with `exchange_code()`
//! 5. Fetch the profile with `fetch_profile()` and hand it to the backend

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use hallowmart_core::rpc::GoogleProfile;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes requested at login. `openid` plus the profile fields we persist.
const SCOPES: &str = "openid email profile";

/// Errors from the Google OAuth flow.
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("userinfo request failed: {0}")]
    Userinfo(String),
}

/// A bearer token obtained from the token endpoint, scoped to one login.
pub struct AccessToken(String);

/// Client for Google's OAuth and userinfo endpoints.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct GoogleClient {
    inner: Arc<GoogleClientInner>,
}

struct GoogleClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
}

impl GoogleClient {
    /// Create a new Google OAuth client.
    #[must_use]
    pub fn new(client_id: String, client_secret: SecretString) -> Self {
        Self {
            inner: Arc::new(GoogleClientInner {
                client: reqwest::Client::new(),
                client_id,
                client_secret,
            }),
        }
    }

    /// Get the OAuth client id (safe to expose in frontend).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    /// Generate the authorization URL for login.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after consent
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{AUTHORIZATION_ENDPOINT}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope={}&\
            state={}",
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Arguments
    ///
    /// * `code` - The authorization code from the OAuth callback
    /// * `redirect_uri` - The same redirect URI used in the authorization request
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, GoogleAuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GoogleAuthError::TokenExchange(text));
        }

        let token: TokenResponse = response.json().await?;
        Ok(AccessToken(token.access_token))
    }

    /// Fetch the signed-in user's profile from the userinfo endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the userinfo request fails.
    pub async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> Result<GoogleProfile, GoogleAuthError> {
        let response = self
            .inner
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.0)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GoogleAuthError::Userinfo(text));
        }

        let info: Userinfo = response.json().await?;
        Ok(GoogleProfile {
            google_id: info.sub,
            email: info.email.unwrap_or_default(),
            display_name: info.name.unwrap_or_default(),
            picture: info.picture.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `OpenID` Connect userinfo response. `sub` is the only guaranteed field.
#[derive(Debug, Deserialize)]
struct Userinfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> GoogleClient {
        GoogleClient::new(
            "client-id".to_owned(),
            SecretString::from("client-secret"),
        )
    }

    #[test]
    fn test_authorization_url_encodes_parameters() {
        let url = test_client()
            .authorization_url("http://localhost:8000/oauth2callback", "abc 123");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Foauth2callback"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=abc%20123"));
    }

    #[test]
    fn test_authorization_url_never_carries_the_secret() {
        let url = test_client().authorization_url("http://localhost:8000/oauth2callback", "s");
        assert!(!url.contains("client-secret"));
    }
}
