//! The cart aggregate.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s with at most one line per
//! item. Adding an item that is already present increments its quantity, and
//! a line whose quantity would reach zero is removed rather than kept. Totals
//! are derived on every call and never cached.
//!
//! The aggregate does no I/O. Callers that need durability (see the
//! storefront's cart service) persist the cart after each returned
//! [`CartChange`] other than [`CartChange::Unchanged`].

use serde::{Deserialize, Serialize};

use crate::types::{Item, ItemId, Price};

/// Errors from cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A quantity of zero or less was given where a positive one is required.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
    /// The item is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),
    /// A stored cart had two lines for the same item.
    #[error("duplicate cart line for item {0}")]
    DuplicateLine(ItemId),
    /// A stored cart had a line with quantity zero.
    #[error("cart line for item {0} has zero quantity")]
    EmptyLine(ItemId),
}

/// One item and how many of it are in the cart.
///
/// The item is a snapshot taken when the line was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: Item,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.unit_price.times(self.quantity)
    }
}

/// What a cart operation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartChange {
    /// A new line was appended.
    Added { item_id: ItemId, quantity: u32 },
    /// An existing line's quantity was increased by `added`.
    Incremented {
        item_id: ItemId,
        added: u32,
        quantity: u32,
    },
    /// A line's quantity was replaced.
    QuantitySet { item_id: ItemId, quantity: u32 },
    /// A line was removed.
    Removed { item_id: ItemId },
    /// Every line was removed.
    Cleared,
    /// The operation was a no-op.
    Unchanged,
}

impl CartChange {
    /// Whether the cart's contents changed.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The shopping cart aggregate.
///
/// ## Examples
///
/// ```
/// use bloom_core::{Cart, Item, ItemId, Price, ShopId};
/// use chrono::Utc;
///
/// let rose = Item {
///     id: ItemId::new("rose-1"),
///     name: "Rose".to_string(),
///     unit_price: Price::from_cents(1000),
///     shop_id: ShopId::new("flowery-fragrant"),
///     description: String::new(),
///     image: String::new(),
///     created_at: Utc::now(),
/// };
///
/// let mut cart = Cart::new();
/// cart.add(&rose, 2).unwrap();
/// cart.add(&rose, 3).unwrap();
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.item_count(), 5);
/// assert_eq!(cart.total().to_string(), "$50.00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of `item`.
    ///
    /// Increments the existing line for the item if there is one, otherwise
    /// appends a new line at the end.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is zero. The cart
    /// is left unchanged.
    pub fn add(&mut self, item: &Item, quantity: u32) -> Result<CartChange, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(CartChange::Incremented {
                item_id: item.id.clone(),
                added: quantity,
                quantity: line.quantity,
            });
        }

        self.lines.push(CartLine {
            item: item.clone(),
            quantity,
        });
        Ok(CartChange::Added {
            item_id: item.id.clone(),
            quantity,
        })
    }

    /// Remove the line for `item_id`. Removing an absent item is a no-op.
    pub fn remove(&mut self, item_id: &ItemId) -> CartChange {
        let before = self.lines.len();
        self.lines.retain(|line| &line.item.id != item_id);

        if self.lines.len() == before {
            CartChange::Unchanged
        } else {
            CartChange::Removed {
                item_id: item_id.clone(),
            }
        }
    }

    /// Set the quantity of the line for `item_id` to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` are clamped. Absent items are a no-op.
    pub fn update_quantity(&mut self, item_id: &ItemId, quantity: i64) -> CartChange {
        if quantity <= 0 {
            return self.remove(item_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.line_mut(item_id) {
            Some(line) if line.quantity == quantity => CartChange::Unchanged,
            Some(line) => {
                line.quantity = quantity;
                CartChange::QuantitySet {
                    item_id: item_id.clone(),
                    quantity,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) -> CartChange {
        if self.lines.is_empty() {
            return CartChange::Unchanged;
        }
        self.lines.clear();
        CartChange::Cleared
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `item_id`, if present.
    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item.id == item_id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, item_id: &ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item.id == item_id)
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        for (index, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(CartError::EmptyLine(line.item.id.clone()));
            }
            if lines
                .iter()
                .take(index)
                .any(|earlier| earlier.item.id == line.item.id)
            {
                return Err(CartError::DuplicateLine(line.item.id.clone()));
            }
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ShopId;

    fn item(id: &str, cents: u32) -> Item {
        Item {
            id: ItemId::new(id),
            name: id.to_uppercase(),
            unit_price: Price::from_cents(cents),
            shop_id: ShopId::new("bloomwell"),
            description: format!("{id} bouquet"),
            image: format!("/static/{id}.jpg"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_add_merges_quantities() {
        let a = item("a", 1000);
        let mut cart = Cart::new();

        cart.add(&a, 2).unwrap();
        let change = cart.add(&a, 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&a.id).unwrap().quantity, 5);
        assert_eq!(
            change,
            CartChange::Incremented {
                item_id: a.id.clone(),
                added: 3,
                quantity: 5
            }
        );
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&item("b", 100), 1).unwrap();
        cart.add(&item("a", 100), 1).unwrap();
        cart.add(&item("b", 100), 1).unwrap();

        let ids: Vec<_> = cart.lines().iter().map(|l| l.item.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_add_rejects_zero() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(&item("a", 100), 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates() {
        let a = item("a", 1);
        let mut cart = Cart::new();
        cart.add(&a, u32::MAX).unwrap();
        cart.add(&a, 10).unwrap();
        assert_eq!(cart.get(&a.id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_update_quantity_replaces() {
        let a = item("a", 100);
        let mut cart = Cart::new();
        cart.add(&a, 4).unwrap();

        let change = cart.update_quantity(&a.id, 2);
        assert_eq!(cart.get(&a.id).unwrap().quantity, 2);
        assert!(change.is_mutation());

        assert_eq!(cart.update_quantity(&a.id, 2), CartChange::Unchanged);
    }

    #[test]
    fn test_update_quantity_floor_removes() {
        let a = item("a", 100);
        let b = item("b", 100);
        let mut cart = Cart::new();
        cart.add(&a, 1).unwrap();
        cart.add(&b, 1).unwrap();

        cart.update_quantity(&a.id, 0);
        cart.update_quantity(&b.id, -1);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&item("a", 100), 1).unwrap();
        assert_eq!(
            cart.update_quantity(&ItemId::new("missing"), 3),
            CartChange::Unchanged
        );
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.remove(&ItemId::new("missing")), CartChange::Unchanged);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        assert_eq!(cart.clear(), CartChange::Unchanged);
        cart.add(&item("a", 100), 1).unwrap();
        assert_eq!(cart.clear(), CartChange::Cleared);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_and_count() {
        let mut cart = Cart::new();
        cart.add(&item("a", 1000), 2).unwrap();
        cart.add(&item("b", 500), 3).unwrap();

        assert_eq!(cart.total().amount(), Decimal::new(35, 0));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_totals_track_mutations() {
        let a = item("a", 250);
        let mut cart = Cart::new();
        cart.add(&a, 2).unwrap();
        assert_eq!(cart.total().to_string(), "$5.00");
        cart.update_quantity(&a.id, 1);
        assert_eq!(cart.total().to_string(), "$2.50");
        cart.remove(&a.id);
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_serde_preserves_lines() {
        let mut cart = Cart::new();
        cart.add(&item("a", 2599), 1).unwrap();
        cart.add(&item("b", 1899), 7).unwrap();
        cart.add(&item("c", 3299), 2).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
        assert_eq!(restored.total(), cart.total());
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        let a = item("a", 100);
        let duplicate = serde_json::to_string(&vec![
            CartLine {
                item: a.clone(),
                quantity: 1,
            },
            CartLine { item: a, quantity: 2 },
        ])
        .unwrap();
        assert!(serde_json::from_str::<Cart>(&duplicate).is_err());

        let zero = serde_json::to_string(&vec![CartLine {
            item: item("b", 100),
            quantity: 0,
        }])
        .unwrap();
        assert!(serde_json::from_str::<Cart>(&zero).is_err());
    }
}
