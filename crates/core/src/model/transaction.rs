//! Completed checkout records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Cart, CartItem};

/// An immutable record of a completed checkout: the cart contents and total
/// at the moment of checkout, plus the completion timestamp. Appended to the
/// user's history, never mutated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the checkout completed.
    pub completed_at: DateTime<Utc>,
    /// Snapshot of the cart lines at checkout.
    pub items: Vec<CartItem>,
    /// Snapshot of the cart total at checkout.
    pub total_cost: Decimal,
}

impl Transaction {
    /// Snapshot a cart into a transaction record.
    #[must_use]
    pub fn checkout(cart: &Cart, completed_at: DateTime<Utc>) -> Self {
        Self {
            completed_at,
            items: cart.items.clone(),
            total_cost: cart.total_cost,
        }
    }
}

/// Aggregate count of transactions across all users, stored as a single
/// named document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransactionCounter {
    /// Total number of completed checkouts.
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::types::ProductId;

    use super::*;

    #[test]
    fn test_checkout_snapshots_cart() {
        let mut cart = Cart::empty();
        cart.add(ProductId::new(1), "pumpkin", dec!(4.00), 3);

        let when = Utc::now();
        let tx = Transaction::checkout(&cart, when);

        assert_eq!(tx.completed_at, when);
        assert_eq!(tx.items, cart.items);
        assert_eq!(tx.total_cost, dec!(12.00));

        // Mutating the cart afterwards must not affect the snapshot.
        cart.clear();
        assert_eq!(tx.items.len(), 1);
        assert_eq!(tx.total_cost, dec!(12.00));
    }
}
