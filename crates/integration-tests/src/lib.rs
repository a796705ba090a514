//! Integration tests for the Bloom storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bloom-integration-tests
//! ```
//!
//! Each test gets its own temporary data directory through [`TestContext`],
//! so tests can run in parallel and nothing touches the working directory.
//!
//! # Test Categories
//!
//! - `durability` - State surviving a reopen of the same data directory
//! - `http_api` - End-to-end flows through the axum router

use std::path::Path;

use axum::Router;
use bloom_core::ContactForm;
use bloom_storefront::config::StorefrontConfig;
use bloom_storefront::routes;
use bloom_storefront::services::Storefront;
use bloom_storefront::state::{AppState, open_storefront};
use bloom_storefront::storage::FileStore;
use tempfile::TempDir;

/// A temporary data directory and helpers to open sessions over it.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create a context with an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Default configuration pointed at this context's data directory.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration fails to load.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        let mut config =
            StorefrontConfig::from_lookup(|_| None).expect("default config is valid");
        config.data_dir = self.dir.path().to_path_buf();
        config
    }

    /// Open a fresh session, as a new process would.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be opened.
    #[must_use]
    pub fn open(&self) -> Storefront<FileStore> {
        open_storefront(&self.config()).expect("failed to open storefront")
    }

    /// Build the HTTP router over a fresh session.
    #[must_use]
    pub fn app(&self) -> Router {
        routes::router(AppState::new(self.open()))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A contact form that passes validation.
#[must_use]
pub fn contact_form() -> ContactForm {
    ContactForm {
        name: "Ivy Green".to_string(),
        email: "ivy@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Fern Lane, Bloomville".to_string(),
    }
}
