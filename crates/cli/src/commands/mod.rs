//! CLI command implementations.
//!
//! Output goes through `tracing` at info level, one line per record.

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;

use std::path::PathBuf;

use bloom_storefront::config::{ConfigError, StorefrontConfig};
use bloom_storefront::repository::RepositoryError;
use bloom_storefront::services::{
    CartUpdateError, CheckoutError, FavoriteError, LookupError, Storefront,
};
use bloom_storefront::state::{StateError, open_storefront};
use bloom_storefront::storage::FileStore;
use thiserror::Error;

/// A storefront session backed by the data directory.
pub type Session = Storefront<FileStore>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not open storefront: {0}")]
    Open(#[from] StateError),

    #[error(transparent)]
    Cart(#[from] CartUpdateError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Favorite(#[from] FavoriteError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Open the session, with `data_dir` taking precedence over the environment.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the store cannot be opened.
pub fn open(data_dir: Option<PathBuf>) -> Result<Session, CliError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "opening storefront");
    Ok(open_storefront(&config)?)
}
