//! Web frontend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WEB_BASE_URL` - Public base URL of this site (used for the OAuth
//!   redirect URI, e.g. `http://localhost:8000`)
//! - `BACKEND_URL` - Base URL of the store service (e.g. `http://localhost:8001`)
//! - `WEB_SESSION_SECRET` - Cookie signing secret, at least 64 bytes
//! - `GOOGLE_CLIENT_ID` - Google OAuth client id
//! - `GOOGLE_CLIENT_SECRET` - Google OAuth client secret
//!
//! ## Optional
//! - `WEB_HOST` - Bind address (default: 127.0.0.1)
//! - `WEB_PORT` - Listen port (default: 8000)
//! - `WEB_STATIC_DIR` - Directory served under `/static`
//!   (default: crates/web/static)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Minimum length of the session cookie signing secret.
const MIN_SESSION_SECRET_LEN: usize = 64;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("WEB_SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes")]
    WeakSessionSecret,
}

/// Web frontend application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this site, no trailing slash
    pub base_url: String,
    /// Base URL of the store service RPC surface
    pub backend_url: String,
    /// Secret used to sign session cookies
    pub session_secret: SecretString,
    /// Google OAuth client id
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: SecretString,
    /// Directory of static assets served under `/static`
    pub static_dir: PathBuf,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WEB_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEB_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("WEB_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEB_PORT".to_owned(), e.to_string()))?;

        let base_url = get_required("WEB_BASE_URL")?
            .trim_end_matches('/')
            .to_owned();
        let backend_url = get_required("BACKEND_URL")?
            .trim_end_matches('/')
            .to_owned();

        let session_secret = SecretString::from(get_required("WEB_SESSION_SECRET")?);
        if session_secret.expose_secret().len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::WeakSessionSecret);
        }

        let google_client_id = get_required("GOOGLE_CLIENT_ID")?;
        let google_client_secret = SecretString::from(get_required("GOOGLE_CLIENT_SECRET")?);

        let static_dir = PathBuf::from(get_env_or_default("WEB_STATIC_DIR", "crates/web/static"));

        Ok(Self {
            host,
            port,
            base_url,
            backend_url,
            session_secret,
            google_client_id,
            google_client_secret,
            static_dir,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The OAuth redirect URI registered with Google.
    #[must_use]
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/oauth2callback", self.base_url)
    }
}

/// Get a required environment variable.
fn get_required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> WebConfig {
        WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: "http://localhost:8000".to_owned(),
            backend_url: "http://localhost:8001".to_owned(),
            session_secret: SecretString::from("x".repeat(64)),
            google_client_id: "client-id".to_owned(),
            google_client_secret: SecretString::from("client-secret"),
            static_dir: PathBuf::from("static"),
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_oauth_redirect_uri() {
        assert_eq!(
            test_config().oauth_redirect_uri(),
            "http://localhost:8000/oauth2callback"
        );
    }
}
