//! The store service: every RPC operation over the document store port.
//!
//! Each operation is an independent read-then-write over whole documents.
//! Nothing is cached and nothing retries; failures surface to the immediate
//! caller. Concurrent requests against the same user are last-write-wins at
//! the document level.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::instrument;

use hallowmart_core::rpc::{
    AddProductRequest, AddProductResponse, CheckoutResponse, ClearCartResponse, GetCartResponse,
    GetProductResponse, GetUserResponse, GoogleProfile, ListProductsResponse, ProductView,
    TransactionCountResponse, UserView,
};
use hallowmart_core::{Product, ProductId, Transaction, TransactionCounter, User, UserId};

use crate::error::{BackendError, Result};
use crate::store::{Datastore, DatastoreError, Key, Kind};

/// Name key of the aggregate transaction counter document.
const COUNTER_NAME: &str = "all-purchases";

/// The store service, generic over the document store adapter.
#[derive(Debug)]
pub struct StoreService<S> {
    store: Arc<S>,
}

// Manual Clone: `S` itself need not be Clone behind the Arc.
impl<S> Clone for StoreService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Datastore> StoreService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The underlying store, for callers that share it (seeding).
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a user by id. An unknown id is `found: false`, never an error;
    /// a non-numeric id is rejected before any storage call.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<GetUserResponse> {
        let user_id = parse_id::<UserId>(id)?;
        match self.load_user(user_id).await? {
            Some(user) => Ok(GetUserResponse {
                found: true,
                user: Some(UserView::from_model(user_id, user)),
            }),
            None => {
                tracing::debug!(id = %user_id, "user not found");
                Ok(GetUserResponse::not_found())
            }
        }
    }

    /// Create-or-fetch a user for an external identity.
    ///
    /// Queries by the provider's id; creates a fresh user on a miss, then
    /// re-fetches by the assigned id to return the canonical record. Two
    /// concurrent first logins with the same identity can both miss the
    /// query and create two records; nothing here prevents that.
    #[instrument(skip(self, profile), fields(google_id = %profile.google_id))]
    pub async fn authorize(&self, profile: &GoogleProfile) -> Result<UserView> {
        let hits = self
            .store
            .query(Kind::User, "google_id", &profile.google_id)
            .await?;

        let id = if let Some((id, _)) = hits.first() {
            tracing::debug!(id, "user exists");
            UserId::new(*id)
        } else {
            let mut user = User::new(
                &profile.google_id,
                &profile.email,
                &profile.display_name,
                &profile.picture,
            );
            let id = self.store.insert(Kind::User, &to_doc(&user)?).await?;
            // Write the assigned id back into the document so the stored
            // record is self-describing.
            user.id = Some(UserId::new(id));
            self.store
                .put(&Key::Id(Kind::User, id), &to_doc(&user)?)
                .await?;
            tracing::info!(id, "created new user");
            UserId::new(id)
        };

        let resp = self.get_user(&id.to_string()).await?;
        match resp.user {
            Some(user) if resp.found => Ok(user),
            _ => Err(BackendError::Inconsistent(format!(
                "cannot find user {id} that was just created"
            ))),
        }
    }

    /// List the whole product catalog.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<ListProductsResponse> {
        let docs = self.store.list(Kind::Product).await?;
        let mut products = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            let product: Product = from_doc(&Key::Id(Kind::Product, id), doc)?;
            products.push(ProductView::from_model(ProductId::new(id), product));
        }
        Ok(ListProductsResponse { products })
    }

    /// Fetch a single product by id.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<GetProductResponse> {
        let product_id = parse_id::<ProductId>(id)?;
        match self.load_product(product_id).await? {
            Some(product) => Ok(GetProductResponse {
                found: true,
                product: Some(ProductView::from_model(product_id, product)),
            }),
            None => {
                tracing::debug!(id = %product_id, "product not found");
                Ok(GetProductResponse {
                    found: false,
                    product: None,
                })
            }
        }
    }

    /// Add `quantity` units of a product to a user's cart.
    ///
    /// The cart keeps one line per product: an existing line has its
    /// quantity incremented under its original cost snapshot, a new line
    /// snapshots the product's current name and cost. The whole user
    /// document is rewritten.
    #[instrument(skip(self, req), fields(user_id = %req.user_id, product_id = %req.product_id))]
    pub async fn add_product_to_cart(&self, req: &AddProductRequest) -> Result<AddProductResponse> {
        let user_id = parse_id::<UserId>(&req.user_id)?;
        let product_id = parse_id::<ProductId>(&req.product_id)?;
        if req.quantity == 0 {
            return Err(BackendError::InvalidQuantity);
        }

        let Some(mut user) = self.load_user(user_id).await? else {
            tracing::warn!(id = %user_id, "add to cart for unknown user");
            return Ok(AddProductResponse { success: false });
        };

        // The product is only consulted when the cart has no line for it
        // yet; merges reuse the line's snapshot.
        let (display_name, unit_cost) = match user
            .cart
            .items
            .iter()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => (item.display_name.clone(), item.unit_cost),
            None => match self.load_product(product_id).await? {
                Some(product) => (product.display_name, product.cost),
                None => {
                    tracing::warn!(id = %product_id, "add to cart for unknown product");
                    return Ok(AddProductResponse { success: false });
                }
            },
        };

        user.cart
            .add(product_id, &display_name, unit_cost, req.quantity);
        self.put_user(user_id, &user).await?;
        Ok(AddProductResponse { success: true })
    }

    /// Read a user's cart.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: &str) -> Result<GetCartResponse> {
        let user_id = parse_id::<UserId>(user_id)?;
        match self.load_user(user_id).await? {
            Some(user) => Ok(GetCartResponse {
                found: true,
                cart: Some(user.cart),
            }),
            None => Ok(GetCartResponse {
                found: false,
                cart: None,
            }),
        }
    }

    /// Reset a user's cart to empty and persist. Idempotent in effect.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: &str) -> Result<ClearCartResponse> {
        let user_id = parse_id::<UserId>(user_id)?;
        let Some(mut user) = self.load_user(user_id).await? else {
            return Ok(ClearCartResponse { success: false });
        };
        user.cart.clear();
        self.put_user(user_id, &user).await?;
        Ok(ClearCartResponse { success: true })
    }

    /// Convert a user's cart into a timestamped transaction record.
    ///
    /// The transaction append and the cart reset land in one document
    /// write, so a crash cannot leave both a recorded transaction and a
    /// still-populated cart. The aggregate counter update that follows is
    /// a separate write with no such guarantee.
    #[instrument(skip(self))]
    pub async fn checkout(&self, user_id: &str) -> Result<CheckoutResponse> {
        let user_id = parse_id::<UserId>(user_id)?;
        let Some(mut user) = self.load_user(user_id).await? else {
            tracing::warn!(id = %user_id, "checkout for unknown user");
            return Ok(CheckoutResponse { success: false });
        };

        let transaction = Transaction::checkout(&user.cart, Utc::now());
        user.transactions.push(transaction);
        user.cart.clear();
        self.put_user(user_id, &user).await?;

        self.increment_counter().await?;
        tracing::info!(id = %user_id, "checkout complete");
        Ok(CheckoutResponse { success: true })
    }

    /// Read the aggregate transaction count. A missing counter document
    /// reads as zero.
    #[instrument(skip(self))]
    pub async fn transaction_count(&self) -> Result<TransactionCountResponse> {
        let key = counter_key();
        let count = match self.store.get(&key).await? {
            Some(doc) => from_doc::<TransactionCounter>(&key, doc)?.count,
            None => 0,
        };
        Ok(TransactionCountResponse { count })
    }

    async fn load_user(&self, id: UserId) -> Result<Option<User>> {
        let key = Key::Id(Kind::User, id.as_i64());
        match self.store.get(&key).await? {
            Some(doc) => Ok(Some(from_doc(&key, doc)?)),
            None => Ok(None),
        }
    }

    async fn load_product(&self, id: ProductId) -> Result<Option<Product>> {
        let key = Key::Id(Kind::Product, id.as_i64());
        match self.store.get(&key).await? {
            Some(doc) => Ok(Some(from_doc(&key, doc)?)),
            None => Ok(None),
        }
    }

    async fn put_user(&self, id: UserId, user: &User) -> Result<()> {
        self.store
            .put(&Key::Id(Kind::User, id.as_i64()), &to_doc(user)?)
            .await?;
        Ok(())
    }

    /// Read-modify-write of the aggregate counter. Not atomic with the
    /// checkout write that precedes it, and concurrent checkouts can lose
    /// increments; the count is an aggregate display figure, not a ledger.
    async fn increment_counter(&self) -> Result<()> {
        let key = counter_key();
        let mut counter = match self.store.get(&key).await? {
            Some(doc) => from_doc::<TransactionCounter>(&key, doc)?,
            None => TransactionCounter::default(),
        };
        counter.count += 1;
        self.store.put(&key, &to_doc(&counter)?).await?;
        Ok(())
    }
}

fn counter_key() -> Key {
    Key::Name(Kind::TransactionCounter, COUNTER_NAME.to_owned())
}

/// Parse a wire id, rejecting non-numeric input before any storage call.
fn parse_id<T: FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| BackendError::MalformedId(raw.to_owned()))
}

fn to_doc<T: serde::Serialize>(entity: &T) -> Result<Value> {
    serde_json::to_value(entity).map_err(|e| {
        BackendError::Inconsistent(format!("failed to serialize document: {e}"))
    })
}

fn from_doc<T: serde::de::DeserializeOwned>(key: &Key, doc: Value) -> Result<T> {
    serde_json::from_value(doc).map_err(|e| {
        BackendError::Datastore(DatastoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use crate::catalog;
    use crate::store::MemoryDatastore;

    use super::*;

    fn service() -> StoreService<MemoryDatastore> {
        StoreService::new(MemoryDatastore::new())
    }

    fn profile(google_id: &str) -> GoogleProfile {
        GoogleProfile {
            google_id: google_id.to_owned(),
            email: format!("{google_id}@example.com"),
            display_name: "Morticia".to_owned(),
            picture: "https://example.com/avatar.png".to_owned(),
        }
    }

    const CATALOG: &str = r#"
    {
        "scented candle": {
            "cost": "9.99",
            "picture_url": "/static/img/candle.png",
            "description": "a mix of pumpkin spice, bonfire, and vanilla"
        },
        "witch hat": {
            "cost": "14.50",
            "picture_url": "/static/img/hat.png",
            "description": "pointy"
        }
    }"#;

    async fn seeded_service() -> StoreService<MemoryDatastore> {
        let svc = service();
        let parsed = catalog::parse_catalog(CATALOG).unwrap();
        catalog::seed_catalog(svc.store(), &parsed).await.unwrap();
        svc
    }

    async fn add(svc: &StoreService<MemoryDatastore>, user: &str, product: &str, qty: u32) {
        let resp = svc
            .add_product_to_cart(&AddProductRequest {
                user_id: user.to_owned(),
                product_id: product.to_owned(),
                quantity: qty,
            })
            .await
            .unwrap();
        assert!(resp.success);
    }

    #[tokio::test]
    async fn test_get_user_unknown_numeric_id_is_not_found() {
        let svc = service();
        let resp = svc.get_user("12345").await.unwrap();
        assert!(!resp.found);
        assert!(resp.user.is_none());
    }

    #[tokio::test]
    async fn test_get_user_non_numeric_id_is_rejected_without_storage_call() {
        let svc = service();
        let err = svc.get_user("not-a-number").await.unwrap_err();
        assert!(matches!(err, BackendError::MalformedId(_)));
        // Nothing was read or written.
        assert!(svc.store().is_empty());
    }

    #[tokio::test]
    async fn test_authorize_creates_user_once() {
        let svc = service();

        let first = svc.authorize(&profile("g-123")).await.unwrap();
        assert!(first.cart.is_empty());
        assert!(first.transactions.is_empty());

        let second = svc.authorize(&profile("g-123")).await.unwrap();
        assert_eq!(second.id, first.id);

        let hits = svc
            .store()
            .query(Kind::User, "google_id", "g-123")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_authorize_distinct_identities_get_distinct_ids() {
        let svc = service();
        let a = svc.authorize(&profile("g-a")).await.unwrap();
        let b = svc.authorize(&profile("g-b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_catalog_visible_through_rpc() {
        let svc = seeded_service().await;
        let listed = svc.list_products().await.unwrap();
        assert_eq!(listed.products.len(), 2);

        let one = svc.get_product(&listed.products[0].id).await.unwrap();
        assert!(one.found);
        assert_eq!(
            one.product.unwrap().display_name,
            listed.products[0].display_name
        );
    }

    #[tokio::test]
    async fn test_get_product_unknown_id_is_not_found() {
        let svc = seeded_service().await;
        let resp = svc.get_product("999").await.unwrap();
        assert!(!resp.found);
    }

    #[tokio::test]
    async fn test_add_same_product_twice_accumulates_quantity() {
        let svc = seeded_service().await;
        let user = svc.authorize(&profile("g-1")).await.unwrap();
        let candle = svc.list_products().await.unwrap().products[0].id.clone();

        add(&svc, &user.id, &candle, 1).await;
        add(&svc, &user.id, &candle, 1).await;

        let cart = svc.get_cart(&user.id).await.unwrap().cart.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_cost, dec!(9.99) * dec!(2));
    }

    #[tokio::test]
    async fn test_add_zero_quantity_is_rejected() {
        let svc = seeded_service().await;
        let user = svc.authorize(&profile("g-1")).await.unwrap();
        let candle = svc.list_products().await.unwrap().products[0].id.clone();

        let err = svc
            .add_product_to_cart(&AddProductRequest {
                user_id: user.id,
                product_id: candle,
                quantity: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidQuantity));
    }

    #[tokio::test]
    async fn test_add_unknown_user_or_product_fails_softly() {
        let svc = seeded_service().await;
        let user = svc.authorize(&profile("g-1")).await.unwrap();
        let candle = svc.list_products().await.unwrap().products[0].id.clone();

        let resp = svc
            .add_product_to_cart(&AddProductRequest {
                user_id: "4242".to_owned(),
                product_id: candle,
                quantity: 1,
            })
            .await
            .unwrap();
        assert!(!resp.success);

        let resp = svc
            .add_product_to_cart(&AddProductRequest {
                user_id: user.id,
                product_id: "4242".to_owned(),
                quantity: 1,
            })
            .await
            .unwrap();
        assert!(!resp.success);
    }

    #[tokio::test]
    async fn test_clear_cart_is_idempotent() {
        let svc = seeded_service().await;
        let user = svc.authorize(&profile("g-1")).await.unwrap();
        let candle = svc.list_products().await.unwrap().products[0].id.clone();
        add(&svc, &user.id, &candle, 3).await;

        assert!(svc.clear_cart(&user.id).await.unwrap().success);
        let first = svc.get_cart(&user.id).await.unwrap().cart.unwrap();

        assert!(svc.clear_cart(&user.id).await.unwrap().success);
        let second = svc.get_cart(&user.id).await.unwrap().cart.unwrap();

        assert_eq!(first, second);
        assert!(second.is_empty());
        assert_eq!(second.total_cost, dec!(0));
    }

    #[tokio::test]
    async fn test_checkout_snapshots_cart_and_empties_it() {
        let svc = seeded_service().await;
        let user = svc.authorize(&profile("g-1")).await.unwrap();
        let products = svc.list_products().await.unwrap().products;
        add(&svc, &user.id, &products[0].id, 2).await;
        add(&svc, &user.id, &products[1].id, 1).await;

        let before = svc.get_cart(&user.id).await.unwrap().cart.unwrap();
        assert!(svc.checkout(&user.id).await.unwrap().success);

        let after = svc.get_cart(&user.id).await.unwrap().cart.unwrap();
        assert!(after.is_empty());

        let refreshed = svc.get_user(&user.id).await.unwrap().user.unwrap();
        assert_eq!(refreshed.transactions.len(), 1);
        assert_eq!(refreshed.transactions[0].items, before.items);
        assert_eq!(refreshed.transactions[0].total_cost, before.total_cost);
    }

    #[tokio::test]
    async fn test_checkout_unknown_user_fails_softly() {
        let svc = service();
        let resp = svc.checkout("777").await.unwrap();
        assert!(!resp.success);
    }

    #[tokio::test]
    async fn test_transaction_counter_reads_zero_then_counts_checkouts() {
        let svc = seeded_service().await;
        assert_eq!(svc.transaction_count().await.unwrap().count, 0);

        let user = svc.authorize(&profile("g-1")).await.unwrap();
        let candle = svc.list_products().await.unwrap().products[0].id.clone();
        add(&svc, &user.id, &candle, 1).await;
        svc.checkout(&user.id).await.unwrap();
        add(&svc, &user.id, &candle, 1).await;
        svc.checkout(&user.id).await.unwrap();

        assert_eq!(svc.transaction_count().await.unwrap().count, 2);
    }
}
