//! Request/response pairs for the backend RPC surface.
//!
//! These are the wire types exchanged between the web tier and the store
//! service. Entity ids travel as decimal strings (the form they take in
//! URLs and cookies); the service parses them and rejects non-numeric ids
//! before touching storage. Absent entities are reported with typed
//! `found`/`success` fields rather than transport-level errors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Cart, Product, Transaction, User};
use crate::types::{ProductId, UserId};

/// Profile fields obtained from the identity provider during login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleProfile {
    /// The identity provider's unique user identifier.
    pub google_id: String,
    pub email: String,
    pub display_name: String,
    pub picture: String,
}

/// A persisted user as returned over the wire, id always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub display_name: String,
    pub picture: String,
    pub cart: Cart,
    pub transactions: Vec<Transaction>,
}

impl UserView {
    /// Build the wire view of a persisted user.
    #[must_use]
    pub fn from_model(id: UserId, user: User) -> Self {
        Self {
            id: id.to_string(),
            google_id: user.google_id,
            email: user.email,
            display_name: user.display_name,
            picture: user.picture,
            cart: user.cart,
            transactions: user.transactions,
        }
    }
}

/// Response to a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub found: bool,
    pub user: Option<UserView>,
}

impl GetUserResponse {
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            found: false,
            user: None,
        }
    }
}

/// A catalog product as returned over the wire, id always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: String,
    pub display_name: String,
    pub cost: Decimal,
    pub description: String,
    pub picture_url: String,
}

impl ProductView {
    /// Build the wire view of a persisted product.
    #[must_use]
    pub fn from_model(id: ProductId, product: Product) -> Self {
        Self {
            id: id.to_string(),
            display_name: product.display_name,
            cost: product.cost,
            description: product.description,
            picture_url: product.picture_url,
        }
    }
}

/// Response to a single-product lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProductResponse {
    pub found: bool,
    pub product: Option<ProductView>,
}

/// Response listing the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProductsResponse {
    pub products: Vec<ProductView>,
}

/// Request to add a quantity of one product to a user's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProductRequest {
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
}

/// Outcome of a cart mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProductResponse {
    pub success: bool,
}

/// Response to a cart read: the cart, or `found: false` for unknown users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCartResponse {
    pub found: bool,
    pub cart: Option<Cart>,
}

/// Outcome of a cart clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearCartResponse {
    pub success: bool,
}

/// Outcome of a checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub success: bool,
}

/// Aggregate transaction count across all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCountResponse {
    pub count: i64,
}
