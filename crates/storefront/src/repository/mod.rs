//! Repositories over the key-value store.
//!
//! Each repository owns one storage key and the JSON encoding of its value:
//!
//! - [`CartRepository`] - `cart`, the current cart lines
//! - [`OrderLogRepository`] - `orderLog`, every submitted order
//! - [`FavoritesRepository`] - `favorites`, favorited item IDs
//!
//! # Decode policy
//!
//! A missing key loads as the empty value. A value that fails to decode is
//! logged as a [`StorageDecodeError`] and also loads as the empty value; it is
//! never surfaced to the caller. Only backend failures (I/O) are returned as
//! errors.
//!
//! The order log is the exception to "loads as empty": it decodes record by
//! record and keeps a copy of a damaged value before overwriting it.

mod cart;
mod favorites;
mod orders;

pub use cart::CartRepository;
pub use favorites::FavoritesRepository;
pub use orders::OrderLogRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

/// Repository error type.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be encoded for storage.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A stored value that could not be decoded.
#[derive(Debug, Error)]
#[error("malformed value under key {key}: {source}")]
pub struct StorageDecodeError {
    pub key: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Read and decode `key`, falling back to `T::default()` when it is absent or malformed.
fn load_or_default<S, T>(store: &S, key: &'static str) -> Result<T, RepositoryError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(source) => {
            let err = StorageDecodeError { key, source };
            tracing::warn!(error = %err, "discarding malformed stored value");
            Ok(T::default())
        }
    }
}

/// Encode `value` and overwrite `key` with it.
fn save<S, T>(store: &S, key: &'static str, value: &T) -> Result<(), RepositoryError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)?;
    Ok(())
}
