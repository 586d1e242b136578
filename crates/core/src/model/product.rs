//! Product catalog entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A catalog product. Created once at startup from the catalog descriptor
/// and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned id, absent until first persisted.
    pub id: Option<ProductId>,
    /// Display name, unique within the catalog.
    pub display_name: String,
    /// Unit cost.
    pub cost: Decimal,
    /// Marketing description.
    pub description: String,
    /// Picture reference shown on the catalog and cart pages.
    pub picture_url: String,
}
