//! Durable string key-value storage.
//!
//! The storefront keeps all of its state under a handful of fixed keys (see
//! [`keys`]). Each value is a complete JSON document that is overwritten as a
//! whole; there are no partial updates.
//!
//! # Backends
//!
//! - [`FileStore`] - One file per key in a data directory, written atomically
//! - [`MemoryStore`] - In-process map for tests and ephemeral sessions

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Fixed storage keys.
pub mod keys {
    /// The current cart.
    pub const CART: &str = "cart";
    /// Every order ever submitted, oldest first.
    pub const ORDER_LOG: &str = "orderLog";
    /// Favorited item IDs.
    pub const FAVORITES: &str = "favorites";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
///
/// Writes are whole-value overwrites. Implementations must make a completed
/// `set` visible to every later `get`, and must never expose a partially
/// written value.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read. A missing key is
    /// `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
