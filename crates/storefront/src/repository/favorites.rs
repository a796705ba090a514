//! Favorites repository.

use bloom_core::ItemId;

use super::{RepositoryError, load_or_default, save};
use crate::storage::{KeyValueStore, keys};

/// Repository for favorited item IDs.
pub struct FavoritesRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> FavoritesRepository<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load favorited IDs in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be read.
    pub fn load(&self) -> Result<Vec<ItemId>, RepositoryError> {
        load_or_default(self.store, keys::FAVORITES)
    }

    /// Overwrite the stored favorites.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be written.
    pub fn save(&self, favorites: &[ItemId]) -> Result<(), RepositoryError> {
        save(self.store, keys::FAVORITES, favorites)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_roundtrip() {
        let store = MemoryStore::new();
        let repo = FavoritesRepository::new(&store);
        assert!(repo.load().unwrap().is_empty());

        repo.save(&[ItemId::new("lily-1"), ItemId::new("rose-2")])
            .unwrap();
        assert_eq!(
            store.get(keys::FAVORITES).unwrap().as_deref(),
            Some("[\"lily-1\",\"rose-2\"]")
        );
        assert_eq!(repo.load().unwrap().len(), 2);
    }
}
