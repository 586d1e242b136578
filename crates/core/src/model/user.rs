//! User entity.

use serde::{Deserialize, Serialize};

use crate::model::{Cart, Transaction};
use crate::types::UserId;

/// A store user, created on first Google login and never deleted.
///
/// The user document is the unit of persistence for the cart/checkout flow:
/// cart and transaction history live inside it and every mutation rewrites
/// the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned id, absent until first persisted.
    pub id: Option<UserId>,
    /// External identity reference from the identity provider.
    pub google_id: String,
    /// Email address reported by the identity provider.
    pub email: String,
    /// Display name reported by the identity provider.
    pub display_name: String,
    /// Avatar reference reported by the identity provider.
    pub picture: String,
    /// The in-progress cart.
    #[serde(default)]
    pub cart: Cart,
    /// Ordered history of completed checkouts, append-only.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl User {
    /// A fresh user for a first-time login: empty cart, no history.
    #[must_use]
    pub fn new(google_id: &str, email: &str, display_name: &str, picture: &str) -> Self {
        Self {
            id: None,
            google_id: google_id.to_owned(),
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            picture: picture.to_owned(),
            cart: Cart::empty(),
            transactions: Vec::new(),
        }
    }
}
