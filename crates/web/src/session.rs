//! Session middleware configuration.
//!
//! Sets up in-memory signed-cookie sessions using tower-sessions. The
//! session carries the logged-in user id and the in-flight OAuth state.

use secrecy::ExposeSecret;
use thiserror::Error;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "hm_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Keys under which values are stored in the session.
pub mod keys {
    /// Id of the logged-in user, as a decimal string.
    pub const USER_ID: &str = "user_id";
    /// CSRF state for the OAuth round-trip, removed on callback.
    pub const OAUTH_STATE: &str = "oauth_state";
}

/// The configured session secret was rejected by the cookie library.
#[derive(Debug, Error)]
#[error("invalid session secret: {0}")]
pub struct SessionKeyError(String);

/// Create the session layer with an in-memory store and signed cookies.
///
/// # Errors
///
/// Returns an error if the session secret cannot be turned into a
/// cookie signing key (too short).
pub fn create_session_layer(
    config: &WebConfig,
) -> Result<SessionManagerLayer<MemoryStore, SignedCookie>, SessionKeyError> {
    let key =
        tower_sessions::cookie::Key::try_from(config.session_secret.expose_secret().as_bytes())
            .map_err(|e| SessionKeyError(e.to_string()))?;

    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::WebConfig;

    fn test_config(secret_len: usize) -> WebConfig {
        WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_owned(),
            backend_url: "http://localhost:8001".to_owned(),
            session_secret: SecretString::from("x".repeat(secret_len)),
            google_client_id: "client-id".to_owned(),
            google_client_secret: SecretString::from("client-secret"),
            static_dir: std::path::PathBuf::from("static"),
        }
    }

    #[test]
    fn test_layer_built_from_long_secret() {
        assert!(create_session_layer(&test_config(64)).is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(create_session_layer(&test_config(16)).is_err());
    }
}
