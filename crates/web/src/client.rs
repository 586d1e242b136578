//! Typed HTTP client for the store service RPC surface.
//!
//! One method per backend operation; request and response bodies are the
//! shared wire types from `hallowmart_core::rpc`.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use hallowmart_core::rpc::{
    AddProductRequest, AddProductResponse, CheckoutResponse, ClearCartResponse, GetCartResponse,
    GetProductResponse, GetUserResponse, GoogleProfile, ListProductsResponse,
    TransactionCountResponse, UserView,
};

/// Errors talking to the store service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, decode).
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend rejected request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Client for the store service.
///
/// Cheaply cloneable via `Arc`; holds a shared `reqwest` connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new client for the store service at `backend_url`.
    #[must_use]
    pub fn new(backend_url: &str) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: backend_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Look up a user by id. Unknown ids come back as `found: false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the id.
    pub async fn get_user(&self, id: &str) -> Result<GetUserResponse, ClientError> {
        self.get(&format!("/rpc/users/{id}")).await
    }

    /// Create-or-fetch the user bound to a Google identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn authorize(&self, profile: &GoogleProfile) -> Result<UserView, ClientError> {
        self.post_json("/rpc/authorize", profile).await
    }

    /// Fetch the whole product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_products(&self) -> Result<ListProductsResponse, ClientError> {
        self.get("/rpc/products").await
    }

    /// Look up a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the id.
    pub async fn get_product(&self, id: &str) -> Result<GetProductResponse, ClientError> {
        self.get(&format!("/rpc/products/{id}")).await
    }

    /// Add `quantity` units of a product to a user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it
    /// (malformed id, zero quantity).
    pub async fn add_product_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<AddProductResponse, ClientError> {
        let request = AddProductRequest {
            user_id: user_id.to_owned(),
            product_id: product_id.to_owned(),
            quantity,
        };
        self.post_json("/rpc/cart/add", &request).await
    }

    /// Fetch a user's cart. Unknown users come back as `found: false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the id.
    pub async fn get_cart(&self, user_id: &str) -> Result<GetCartResponse, ClientError> {
        self.get(&format!("/rpc/cart/{user_id}")).await
    }

    /// Empty a user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the id.
    pub async fn clear_cart(&self, user_id: &str) -> Result<ClearCartResponse, ClientError> {
        self.post_empty(&format!("/rpc/cart/{user_id}/clear")).await
    }

    /// Turn a user's cart into a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the id.
    pub async fn checkout(&self, user_id: &str) -> Result<CheckoutResponse, ClientError> {
        self.post_empty(&format!("/rpc/checkout/{user_id}")).await
    }

    /// Fetch the aggregate purchase count across all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn transaction_count(&self) -> Result<TransactionCountResponse, ClientError> {
        self.get("/rpc/transactions/count").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        Self::parse(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.inner.client.post(self.url(path)).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected { status, body });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = BackendClient::new("http://localhost:8001/");
        assert_eq!(
            client.url("/rpc/products"),
            "http://localhost:8001/rpc/products"
        );
    }
}
