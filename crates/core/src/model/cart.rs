//! Cart and cart line types, plus the cart mutation logic.
//!
//! A cart behaves like a set keyed by product id: there is at most one
//! [`CartItem`] per distinct product, and repeated adds of the same product
//! accumulate into that line's quantity. The running total is maintained
//! incrementally - each mutation adds `unit_cost x quantity` using the cost
//! snapshot taken when the line was created, never the live product price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One line within a cart: a product reference with cost and name snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product display name at the time the line was created.
    pub display_name: String,
    /// Unit cost at the time the line was created.
    pub unit_cost: Decimal,
    /// Number of units of this product.
    pub quantity: u32,
}

impl CartItem {
    /// Cost of this line (`unit_cost x quantity`).
    #[must_use]
    pub fn line_cost(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }
}

/// A user's in-progress, uncommitted set of product selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cart {
    /// Cart lines, at most one per distinct product id.
    pub items: Vec<CartItem>,
    /// Running total, maintained incrementally on each mutation.
    pub total_cost: Decimal,
}

impl Cart {
    /// An empty cart with a zero total.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// If a line for this product already exists its quantity is incremented
    /// and the existing cost snapshot is kept; otherwise a new line is created
    /// with the given name and cost snapshots. Either way the running total
    /// grows by the snapshot unit cost times `quantity`.
    pub fn add(
        &mut self,
        product_id: ProductId,
        display_name: &str,
        unit_cost: Decimal,
        quantity: u32,
    ) {
        let added_cost = match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity += quantity;
                item.unit_cost * Decimal::from(quantity)
            }
            None => {
                self.items.push(CartItem {
                    product_id,
                    display_name: display_name.to_owned(),
                    unit_cost,
                    quantity,
                });
                unit_cost * Decimal::from(quantity)
            }
        };
        self.total_cost += added_cost;
    }

    /// Reset the cart to empty with a zero total. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_cost = Decimal::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn candle() -> (ProductId, &'static str, Decimal) {
        (ProductId::new(1), "scented candle", dec!(9.99))
    }

    #[test]
    fn test_add_new_product_creates_line() {
        let mut cart = Cart::empty();
        let (id, name, cost) = candle();
        cart.add(id, name, cost, 2);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].display_name, "scented candle");
        assert_eq!(cart.total_cost, dec!(19.98));
    }

    #[test]
    fn test_add_same_product_twice_accumulates_quantity() {
        let mut cart = Cart::empty();
        let (id, name, cost) = candle();
        cart.add(id, name, cost, 1);
        cart.add(id, name, cost, 1);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_cost, dec!(19.98));
    }

    #[test]
    fn test_add_merges_first_line_too() {
        // Regression for merging against the line at index zero.
        let mut cart = Cart::empty();
        let (id, name, cost) = candle();
        cart.add(id, name, cost, 1);
        cart.add(ProductId::new(2), "witch hat", dec!(14.50), 1);
        cart.add(id, name, cost, 3);

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 4);
        assert_eq!(cart.total_cost, dec!(9.99) * dec!(4) + dec!(14.50));
    }

    #[test]
    fn test_merge_keeps_original_cost_snapshot() {
        let mut cart = Cart::empty();
        let (id, name, _) = candle();
        cart.add(id, name, dec!(10.00), 1);
        // A later add quotes a different price; the snapshot wins.
        cart.add(id, name, dec!(12.00), 1);

        assert_eq!(cart.items[0].unit_cost, dec!(10.00));
        assert_eq!(cart.total_cost, dec!(20.00));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::empty();
        let (id, name, cost) = candle();
        cart.add(id, name, cost, 3);

        cart.clear();
        let after_first = cart.clone();
        cart.clear();

        assert_eq!(cart, after_first);
        assert!(cart.is_empty());
        assert_eq!(cart.total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_unit_count_sums_quantities() {
        let mut cart = Cart::empty();
        let (id, name, cost) = candle();
        cart.add(id, name, cost, 2);
        cart.add(ProductId::new(2), "witch hat", dec!(14.50), 5);
        assert_eq!(cart.unit_count(), 7);
    }
}
