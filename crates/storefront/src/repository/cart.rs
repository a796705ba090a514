//! Cart repository.

use bloom_core::Cart;

use super::{RepositoryError, load_or_default, save};
use crate::storage::{KeyValueStore, keys};

/// Repository for the persisted cart.
pub struct CartRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CartRepository<'a, S> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load the stored cart, or an empty one if none is stored or it is malformed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be read.
    pub fn load(&self) -> Result<Cart, RepositoryError> {
        load_or_default(self.store, keys::CART)
    }

    /// Overwrite the stored cart with the full current state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be written.
    pub fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        save(self.store, keys::CART, cart)
    }
}
