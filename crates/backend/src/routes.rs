//! HTTP transport for the RPC surface.
//!
//! Every operation is a JSON request/response pair under `/rpc`. Entity ids
//! appear in paths as strings and are validated by the service; absent
//! entities come back as `found: false` / `success: false` bodies, not
//! transport errors.
//!
//! ```text
//! GET  /health                      - liveness check
//! GET  /rpc/users/{id}              - fetch a user
//! POST /rpc/authorize               - create-or-fetch by external identity
//! GET  /rpc/products                - list the catalog
//! GET  /rpc/products/{id}           - fetch a product
//! POST /rpc/cart/add                - add a product to a user's cart
//! GET  /rpc/cart/{user_id}          - read a cart
//! POST /rpc/cart/{user_id}/clear    - reset a cart
//! POST /rpc/checkout/{user_id}      - convert a cart into a transaction
//! GET  /rpc/transactions/count      - aggregate transaction count
//! ```

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use hallowmart_core::rpc::{
    AddProductRequest, AddProductResponse, CheckoutResponse, ClearCartResponse, GetCartResponse,
    GetProductResponse, GetUserResponse, GoogleProfile, ListProductsResponse,
    TransactionCountResponse, UserView,
};

use crate::error::BackendError;
use crate::service::StoreService;
use crate::store::Datastore;

/// Shared handler state: the store service.
#[derive(Debug)]
pub struct AppState<S> {
    service: StoreService<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Build the backend router around a store service.
pub fn router<S: Datastore>(service: StoreService<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rpc/users/{id}", get(get_user::<S>))
        .route("/rpc/authorize", post(authorize::<S>))
        .route("/rpc/products", get(list_products::<S>))
        .route("/rpc/products/{id}", get(get_product::<S>))
        .route("/rpc/cart/add", post(add_product_to_cart::<S>))
        .route("/rpc/cart/{user_id}", get(get_cart::<S>))
        .route("/rpc/cart/{user_id}/clear", post(clear_cart::<S>))
        .route("/rpc/checkout/{user_id}", post(checkout::<S>))
        .route("/rpc/transactions/count", get(transaction_count::<S>))
        .with_state(AppState { service })
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn get_user<S: Datastore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<GetUserResponse>, BackendError> {
    Ok(Json(state.service.get_user(&id).await?))
}

async fn authorize<S: Datastore>(
    State(state): State<AppState<S>>,
    Json(profile): Json<GoogleProfile>,
) -> Result<Json<UserView>, BackendError> {
    Ok(Json(state.service.authorize(&profile).await?))
}

async fn list_products<S: Datastore>(
    State(state): State<AppState<S>>,
) -> Result<Json<ListProductsResponse>, BackendError> {
    Ok(Json(state.service.list_products().await?))
}

async fn get_product<S: Datastore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<GetProductResponse>, BackendError> {
    Ok(Json(state.service.get_product(&id).await?))
}

async fn add_product_to_cart<S: Datastore>(
    State(state): State<AppState<S>>,
    Json(req): Json<AddProductRequest>,
) -> Result<Json<AddProductResponse>, BackendError> {
    Ok(Json(state.service.add_product_to_cart(&req).await?))
}

async fn get_cart<S: Datastore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<GetCartResponse>, BackendError> {
    Ok(Json(state.service.get_cart(&user_id).await?))
}

async fn clear_cart<S: Datastore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<ClearCartResponse>, BackendError> {
    Ok(Json(state.service.clear_cart(&user_id).await?))
}

async fn checkout<S: Datastore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<CheckoutResponse>, BackendError> {
    Ok(Json(state.service.checkout(&user_id).await?))
}

async fn transaction_count<S: Datastore>(
    State(state): State<AppState<S>>,
) -> Result<Json<TransactionCountResponse>, BackendError> {
    Ok(Json(state.service.transaction_count().await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::store::MemoryDatastore;

    use super::*;

    fn app() -> Router {
        router(StoreService::new(MemoryDatastore::new()))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
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
    async fn test_unknown_numeric_user_is_found_false_not_error() {
        let response = app()
            .oneshot(Request::get("/rpc/users/12345").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["found"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn test_non_numeric_user_id_is_bad_request() {
        let response = app()
            .oneshot(
                Request::get("/rpc/users/not-a-number")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_zero_quantity_add_is_bad_request() {
        let req = Request::post("/rpc/cart/add")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"user_id": "1", "product_id": "1", "quantity": 0}"#,
            ))
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_transaction_count_defaults_to_zero() {
        let response = app()
            .oneshot(
                Request::get("/rpc/transactions/count")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], serde_json::json!(0));
    }
}
