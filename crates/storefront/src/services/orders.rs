//! Order history lookups.

use bloom_core::{Order, OrderId};
use thiserror::Error;

use super::Storefront;
use crate::repository::{OrderLogRepository, RepositoryError};
use crate::storage::KeyValueStore;

/// Order lookup error type.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No order in the log has this ID.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// The order log could not be read.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl<S: KeyValueStore> Storefront<S> {
    /// Fetch one order by ID.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::NotFound` if the log has no such order.
    pub fn order_by_id(&self, id: &OrderId) -> Result<Order, LookupError> {
        OrderLogRepository::new(&self.store)
            .find(id)?
            .ok_or_else(|| LookupError::NotFound(id.clone()))
    }

    /// Every submitted order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the log cannot be read.
    pub fn orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = OrderLogRepository::new(&self.store).load()?;
        orders.reverse();
        Ok(orders)
    }
}
