//! Cart operations.
//!
//! Every mutation follows the same sequence: apply it to the in-memory
//! aggregate, write the full cart back to storage, then notify subscribers.
//! No-op mutations (removing an absent item, say) skip the last two steps.
//!
//! If the write fails the in-memory cart is restored to what it was before
//! the mutation and the caller gets [`CartUpdateError::Storage`].

use bloom_core::{Cart, CartChange, CartError, ItemId, Price};
use serde::Serialize;
use thiserror::Error;

use super::Storefront;
use crate::repository::{CartRepository, RepositoryError};
use crate::storage::KeyValueStore;

/// Callback invoked after every cart mutation.
pub type CartListener = Box<dyn Fn(&CartEvent) + Send + Sync>;

/// Handle returned by [`Storefront::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Notification sent to cart subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEvent {
    pub change: CartChange,
    /// Sum of quantities after the change.
    pub item_count: u64,
    /// Cart total after the change.
    pub total: Price,
}

/// Cart mutation error type. The cart is unchanged whenever one is returned.
#[derive(Debug, Error)]
pub enum CartUpdateError {
    /// The mutation itself was invalid.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The new cart could not be saved.
    #[error("failed to save cart: {0}")]
    Storage(#[from] RepositoryError),
}

impl<S: KeyValueStore> Storefront<S> {
    /// Add `quantity` of a catalog item to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownItem` if the item is not in the catalog,
    /// `CartError::InvalidQuantity` if `quantity` is zero, and
    /// `CartUpdateError::Storage` if the cart could not be saved.
    pub fn add_to_cart(
        &mut self,
        item_id: &ItemId,
        quantity: u32,
    ) -> Result<CartChange, CartUpdateError> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| CartError::UnknownItem(item_id.clone()))?
            .clone();
        self.apply(|cart| cart.add(&item, quantity))
    }

    /// Remove an item's line. Removing an item that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartUpdateError::Storage` if the cart could not be saved.
    pub fn remove_from_cart(&mut self, item_id: &ItemId) -> Result<CartChange, CartUpdateError> {
        self.apply(|cart| Ok(cart.remove(item_id)))
    }

    /// Set an item's quantity. Zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartUpdateError::Storage` if the cart could not be saved.
    pub fn update_quantity(
        &mut self,
        item_id: &ItemId,
        quantity: i64,
    ) -> Result<CartChange, CartUpdateError> {
        self.apply(|cart| Ok(cart.update_quantity(item_id, quantity)))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartUpdateError::Storage` if the cart could not be saved.
    pub fn clear_cart(&mut self) -> Result<CartChange, CartUpdateError> {
        self.apply(|cart| Ok(cart.clear()))
    }

    /// Current cart total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Current sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Read-only view of the cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Register a callback to run after every cart mutation.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&CartEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Run `mutate` against the cart, save, and notify. Restores the cart if saving fails.
    fn apply(
        &mut self,
        mutate: impl FnOnce(&mut Cart) -> Result<CartChange, CartError>,
    ) -> Result<CartChange, CartUpdateError> {
        let previous = self.cart.clone();
        let change = mutate(&mut self.cart)?;
        if !change.is_mutation() {
            return Ok(change);
        }

        if let Err(e) = self.save_cart() {
            tracing::error!(error = %e, "failed to persist cart, change rolled back");
            self.cart = previous;
            return Err(e.into());
        }

        self.notify(&change);
        Ok(change)
    }

    pub(super) fn save_cart(&self) -> Result<(), RepositoryError> {
        CartRepository::new(&self.store).save(&self.cart)
    }

    pub(super) fn notify(&self, change: &CartChange) {
        let event = CartEvent {
            change: change.clone(),
            item_count: self.cart.item_count(),
            total: self.cart.total(),
        };
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::{MemoryStore, StorageError, keys};

    /// Wraps a store so reads pass through and every write fails.
    struct ReadOnly(MemoryStore);

    impl KeyValueStore for ReadOnly {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_owned()))
        }
    }

    fn storefront() -> Storefront<Arc<MemoryStore>> {
        Storefront::open(Arc::new(MemoryStore::new()), Arc::new(Catalog::demo())).unwrap()
    }

    #[test]
    fn test_add_merges_and_persists() {
        let mut sf = storefront();
        let rose = ItemId::new("rose-1");

        sf.add_to_cart(&rose, 2).unwrap();
        sf.add_to_cart(&rose, 3).unwrap();

        assert_eq!(sf.cart().len(), 1);
        assert_eq!(sf.item_count(), 5);

        let stored = CartRepository::new(sf.store()).load().unwrap();
        assert_eq!(&stored, sf.cart());
    }

    #[test]
    fn test_add_unknown_item() {
        let mut sf = storefront();
        let err = sf.add_to_cart(&ItemId::new("cactus"), 1).unwrap_err();
        assert!(matches!(
            err,
            CartUpdateError::Cart(CartError::UnknownItem(id)) if id.as_str() == "cactus"
        ));
        assert!(sf.store().get(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_add_zero_rejected() {
        let mut sf = storefront();
        assert!(matches!(
            sf.add_to_cart(&ItemId::new("rose-1"), 0),
            Err(CartUpdateError::Cart(CartError::InvalidQuantity(0)))
        ));
        assert!(sf.cart().is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let mut sf = storefront();
        let tulip = ItemId::new("tulip-1");
        let daisy = ItemId::new("daisy-1");
        sf.add_to_cart(&tulip, 1).unwrap();
        sf.add_to_cart(&daisy, 1).unwrap();

        sf.update_quantity(&tulip, 4).unwrap();
        assert_eq!(sf.cart().get(&tulip).unwrap().quantity, 4);

        sf.update_quantity(&tulip, -1).unwrap();
        assert!(sf.cart().get(&tulip).is_none());

        assert_eq!(sf.remove_from_cart(&tulip).unwrap(), CartChange::Unchanged);
        sf.remove_from_cart(&daisy).unwrap();
        assert!(sf.cart().is_empty());
        assert!(CartRepository::new(sf.store()).load().unwrap().is_empty());
    }

    #[test]
    fn test_total_reflects_catalog_prices() {
        let mut sf = storefront();
        sf.add_to_cart(&ItemId::new("rose-1"), 2).unwrap();
        sf.add_to_cart(&ItemId::new("tulip-1"), 1).unwrap();
        assert_eq!(sf.total().amount(), Decimal::new(7097, 2));
    }

    #[test]
    fn test_reopen_restores_cart() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::demo());
        {
            let mut sf = Storefront::open(Arc::clone(&store), Arc::clone(&catalog)).unwrap();
            sf.add_to_cart(&ItemId::new("lily-2"), 2).unwrap();
            sf.add_to_cart(&ItemId::new("rose-2"), 1).unwrap();
        }

        let sf = Storefront::open(store, catalog).unwrap();
        assert_eq!(sf.item_count(), 3);
        assert_eq!(sf.cart().lines()[0].item.id.as_str(), "lily-2");
    }

    #[test]
    fn test_subscribers_see_mutations_only() {
        let mut sf = storefront();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = sf.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        sf.add_to_cart(&ItemId::new("daisy-1"), 2).unwrap();
        sf.remove_from_cart(&ItemId::new("absent")).unwrap();
        sf.clear_cart().unwrap();

        {
            let events = seen.lock().unwrap();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0].item_count, 2);
            assert_eq!(events[0].total.to_string(), "$45.98");
            assert_eq!(events[1].change, CartChange::Cleared);
            assert_eq!(events[1].total, Price::ZERO);
        }

        assert!(sf.unsubscribe(id));
        assert!(!sf.unsubscribe(id));
        sf.add_to_cart(&ItemId::new("daisy-1"), 1).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_save_rolls_back_and_reports() {
        let store = ReadOnly(MemoryStore::new());
        let mut sf = Storefront::open(store, Arc::new(Catalog::demo())).unwrap();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        sf.subscribe(move |_| *sink.lock().unwrap() += 1);

        let err = sf.add_to_cart(&ItemId::new("rose-1"), 2).unwrap_err();
        assert!(matches!(err, CartUpdateError::Storage(_)));
        assert!(sf.cart().is_empty());
        assert_eq!(sf.item_count(), 0);
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_failed_clear_keeps_lines() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::demo());
        let mut sf = Storefront::open(Arc::clone(&store), Arc::clone(&catalog)).unwrap();
        sf.add_to_cart(&ItemId::new("daisy-1"), 3).unwrap();

        let raw = store.get(keys::CART).unwrap().unwrap();
        let frozen = MemoryStore::with_entries([(keys::CART, raw)]);
        let mut sf = Storefront::open(ReadOnly(frozen), catalog).unwrap();
        assert_eq!(sf.item_count(), 3);

        assert!(matches!(sf.clear_cart(), Err(CartUpdateError::Storage(_))));
        assert_eq!(sf.item_count(), 3);
    }
}
