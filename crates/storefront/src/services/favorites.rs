//! Favorited items and catalog browsing.

use bloom_core::{Item, ItemId};
use thiserror::Error;

use super::Storefront;
use crate::catalog::CatalogQuery;
use crate::repository::{FavoritesRepository, RepositoryError};
use crate::storage::KeyValueStore;

/// Favorites error type. Favorites are unchanged whenever one is returned.
#[derive(Debug, Error)]
pub enum FavoriteError {
    /// The item is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// The new favorites list could not be saved.
    #[error("failed to save favorites: {0}")]
    Storage(#[from] RepositoryError),
}

impl<S: KeyValueStore> Storefront<S> {
    /// Flip an item's favorite flag. Returns whether it is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns `FavoriteError::UnknownItem` if the item is not in the catalog
    /// and `FavoriteError::Storage` if the change could not be saved.
    pub fn toggle_favorite(&mut self, item_id: &ItemId) -> Result<bool, FavoriteError> {
        if self.catalog.item(item_id).is_none() {
            return Err(FavoriteError::UnknownItem(item_id.clone()));
        }

        let mut favorites = self.favorites.clone();
        let now_favorite = if let Some(pos) = favorites.iter().position(|id| id == item_id) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(item_id.clone());
            true
        };

        if let Err(e) = FavoritesRepository::new(&self.store).save(&favorites) {
            tracing::error!(error = %e, "failed to persist favorites");
            return Err(e.into());
        }

        self.favorites = favorites;
        Ok(now_favorite)
    }

    #[must_use]
    pub fn is_favorite(&self, item_id: &ItemId) -> bool {
        self.favorites.contains(item_id)
    }

    /// Favorited item IDs, in the order they were favorited.
    #[must_use]
    pub fn favorites(&self) -> &[ItemId] {
        &self.favorites
    }

    /// Catalog listing for `query`, favorites first.
    #[must_use]
    pub fn browse(&self, query: &CatalogQuery) -> Vec<&Item> {
        self.catalog.query(query, &self.favorites)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{Catalog, SortKey, SortOrder};
    use crate::storage::{MemoryStore, StorageError};

    #[test]
    fn test_toggle_round_trip_and_persist() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::demo());
        let lily = ItemId::new("lily-1");

        let mut sf = Storefront::open(Arc::clone(&store), Arc::clone(&catalog)).unwrap();
        assert!(sf.toggle_favorite(&lily).unwrap());
        assert!(sf.is_favorite(&lily));

        let reopened = Storefront::open(Arc::clone(&store), Arc::clone(&catalog)).unwrap();
        assert_eq!(reopened.favorites(), [lily.clone()]);

        assert!(!sf.toggle_favorite(&lily).unwrap());
        let reopened = Storefront::open(store, catalog).unwrap();
        assert!(reopened.favorites().is_empty());
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut sf = Storefront::open(MemoryStore::new(), Arc::new(Catalog::demo())).unwrap();
        assert!(matches!(
            sf.toggle_favorite(&ItemId::new("cactus")),
            Err(FavoriteError::UnknownItem(id)) if id.as_str() == "cactus"
        ));
    }

    #[test]
    fn test_browse_puts_favorites_first() {
        let mut sf = Storefront::open(MemoryStore::new(), Arc::new(Catalog::demo())).unwrap();
        sf.toggle_favorite(&ItemId::new("rose-2")).unwrap();

        let query = CatalogQuery {
            sort: SortKey::Price,
            order: SortOrder::Asc,
            ..CatalogQuery::default()
        };
        let listed: Vec<&str> = sf.browse(&query).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(listed[0], "rose-2");
        assert_eq!(listed[1], "tulip-1");
    }

    #[test]
    fn test_failed_save_keeps_favorites() {
        struct NoWrites;

        impl KeyValueStore for NoWrites {
            fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(None)
            }

            fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::Poisoned)
            }
        }

        let mut sf = Storefront::open(NoWrites, Arc::new(Catalog::demo())).unwrap();
        let lily = ItemId::new("lily-1");

        assert!(matches!(
            sf.toggle_favorite(&lily),
            Err(FavoriteError::Storage(_))
        ));
        assert!(!sf.is_favorite(&lily));
        assert!(sf.favorites().is_empty());
    }
}
