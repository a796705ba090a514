//! Business logic services for the storefront.
//!
//! All operations hang off [`Storefront`], the session-scoped store object.
//! It is constructed once with [`Storefront::open`], which rehydrates the cart
//! and favorites from storage, and then handed to whatever drives it (the
//! HTTP routes, the CLI, tests). There is no ambient global state.
//!
//! # Services
//!
//! - [`cart`] - Cart mutations, derived totals, change subscriptions
//! - [`checkout`] - Turning the cart and contact details into an order
//! - [`orders`] - Reading the order log
//! - [`favorites`] - Favorited items and catalog browsing

pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod orders;

pub use cart::{CartEvent, CartUpdateError, SubscriptionId};
pub use checkout::{CheckoutError, Rejection};
pub use favorites::FavoriteError;
pub use orders::LookupError;

use std::sync::Arc;

use bloom_core::{Cart, ItemId, ShopId};

use crate::catalog::Catalog;
use crate::repository::{CartRepository, FavoritesRepository, RepositoryError};
use crate::storage::KeyValueStore;

/// The cart, favorites, and order log for one shopper, backed by a store.
///
/// Mutating methods take `&mut self`; callers that share a `Storefront`
/// across tasks wrap it in a mutex so every operation runs to completion
/// before the next one starts.
pub struct Storefront<S> {
    store: S,
    catalog: Arc<Catalog>,
    default_shop: Option<ShopId>,
    cart: Cart,
    favorites: Vec<ItemId>,
    listeners: Vec<(SubscriptionId, cart::CartListener)>,
    next_listener: u64,
}

impl<S: KeyValueStore> Storefront<S> {
    /// Open a session over `store`, restoring any saved cart and favorites.
    ///
    /// Malformed saved data is discarded (and logged) rather than reported.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be read.
    pub fn open(store: S, catalog: Arc<Catalog>) -> Result<Self, RepositoryError> {
        let cart = CartRepository::new(&store).load()?;
        let favorites = FavoritesRepository::new(&store).load()?;

        tracing::debug!(
            lines = cart.len(),
            items = cart.item_count(),
            favorites = favorites.len(),
            "storefront session opened"
        );

        Ok(Self {
            store,
            catalog,
            default_shop: None,
            cart,
            favorites,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    /// Attribute orders to `shop` when the cart does not determine one.
    ///
    /// Unknown shop IDs are ignored with a warning and the catalog's first
    /// shop is used instead.
    #[must_use]
    pub fn with_default_shop(mut self, shop: ShopId) -> Self {
        if self.catalog.shop(&shop).is_some() {
            self.default_shop = Some(shop);
        } else {
            tracing::warn!(shop = %shop, "default shop not in catalog, ignoring");
        }
        self
    }

    /// The catalog this session sells from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}
