//! Application state shared across handlers.

use std::sync::Arc;

use crate::client::BackendClient;
use crate::config::WebConfig;
use crate::google::GoogleClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    backend: BackendClient,
    google: GoogleClient,
}

impl AppState {
    /// Create a new application state from loaded configuration.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        let backend = BackendClient::new(&config.backend_url);
        let google = GoogleClient::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                google,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the store service client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleClient {
        &self.inner.google
    }
}
