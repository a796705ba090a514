//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::repository::RepositoryError;
use crate::services::Storefront;
use crate::storage::{FileStore, StorageError};

/// Error building application state at start-up.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to restore session: {0}")]
    Restore(#[from] RepositoryError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront session sits
/// behind an async mutex so each request runs its operation to completion
/// before the next one starts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    storefront: Mutex<Storefront<FileStore>>,
}

impl AppState {
    /// Wrap an already-open storefront session.
    #[must_use]
    pub fn new(storefront: Storefront<FileStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                storefront: Mutex::new(storefront),
            }),
        }
    }

    /// Load the catalog, open the data directory, and restore the session.
    ///
    /// # Errors
    ///
    /// See [`open_storefront`].
    pub fn open(config: &StorefrontConfig) -> Result<Self, StateError> {
        Ok(Self::new(open_storefront(config)?))
    }

    /// Lock the storefront session for one operation.
    pub async fn storefront(&self) -> MutexGuard<'_, Storefront<FileStore>> {
        self.inner.storefront.lock().await
    }
}

/// Open the storefront session described by `config`.
///
/// Uses the catalog document at `catalog_path` when set, otherwise the demo
/// catalog, and a file store rooted at `data_dir`.
///
/// # Errors
///
/// Returns an error if the catalog document is unreadable or invalid, the
/// data directory cannot be created, or the saved session cannot be read.
pub fn open_storefront(config: &StorefrontConfig) -> Result<Storefront<FileStore>, StateError> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::demo(),
    };
    let store = FileStore::open(&config.data_dir)?;
    let storefront = Storefront::open(store, Arc::new(catalog))?
        .with_default_shop(config.default_shop.clone());

    tracing::debug!(
        data_dir = %config.data_dir.display(),
        items = storefront.catalog().items().len(),
        "storefront session restored"
    );

    Ok(storefront)
}
