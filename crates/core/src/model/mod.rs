//! Domain entities persisted by the store service.
//!
//! Every entity serializes with serde; the backend persists them as whole
//! JSON documents under store-assigned numeric keys. There are no partial
//! updates anywhere in the system: each mutation rewrites the full document.

pub mod cart;
pub mod product;
pub mod transaction;
pub mod user;

pub use cart::{Cart, CartItem};
pub use product::Product;
pub use transaction::{Transaction, TransactionCounter};
pub use user::User;
