//! Immutable order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::{CustomerContact, OrderId, Price, Shop};

/// A completed checkout.
///
/// Orders own a deep copy of the cart lines and the total as they were at
/// submission. Nothing recomputes or edits them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub contact: CustomerContact,
    pub submitted_at: DateTime<Utc>,
    pub shop: Shop,
}

impl Order {
    /// Snapshot `cart` into a new order.
    #[must_use]
    pub fn from_cart(
        id: OrderId,
        cart: &Cart,
        contact: CustomerContact,
        shop: Shop,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            lines: cart.lines().to_vec(),
            total: cart.total(),
            contact,
            submitted_at,
            shop,
        }
    }

    /// Sum of quantities over the order's lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
