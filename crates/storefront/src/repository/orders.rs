//! Order log repository.
//!
//! The log is a single JSON array under `orderLog`. Appending reads the whole
//! log, pushes the new order, and writes the whole log back.
//!
//! Records are decoded one at a time. A record that fails to decode is
//! skipped when reading but written back untouched on append, so no
//! submitted order is ever dropped. If the value is not a JSON array at all,
//! it is copied to `orderLog-damaged-<millis>` before the first append
//! replaces it.

use bloom_core::{Order, OrderId};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use super::{RepositoryError, StorageDecodeError, save};
use crate::storage::{KeyValueStore, keys};

/// The stored log: every raw record plus the ones that decoded.
#[derive(Default)]
struct LogRead {
    records: Vec<Value>,
    orders: Vec<Order>,
    unreadable: Option<String>,
}

/// Repository for the append-only order log.
pub struct OrderLogRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> OrderLogRepository<'a, S> {
    /// Create a new order log repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load every readable order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be read.
    pub fn load(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.read()?.orders)
    }

    /// Build an order from the current log and append it, reading the log once.
    ///
    /// `build` sees every readable order, which lets it pick an unused ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be read or
    /// written, and `RepositoryError::Encode` if the order cannot be encoded.
    pub fn append_with(
        &self,
        build: impl FnOnce(&[Order]) -> Order,
    ) -> Result<Order, RepositoryError> {
        let LogRead {
            mut records,
            orders,
            unreadable,
        } = self.read()?;

        if let Some(raw) = unreadable {
            let backup = format!(
                "{}-damaged-{}",
                keys::ORDER_LOG,
                Utc::now().timestamp_millis()
            );
            self.store.set(&backup, &raw)?;
            tracing::warn!(backup = %backup, "order log unreadable, copy saved before rewrite");
        }

        let order = build(&orders);
        records.push(serde_json::to_value(&order)?);
        save(self.store, keys::ORDER_LOG, &records)?;
        Ok(order)
    }

    /// Find an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store cannot be read.
    pub fn find(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.load()?.into_iter().find(|order| &order.id == id))
    }

    fn read(&self) -> Result<LogRead, RepositoryError> {
        let Some(raw) = self.store.get(keys::ORDER_LOG)? else {
            return Ok(LogRead::default());
        };

        let records: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(source) => {
                let err = StorageDecodeError {
                    key: keys::ORDER_LOG,
                    source,
                };
                tracing::warn!(error = %err, "order log unreadable, treating as empty");
                return Ok(LogRead {
                    unreadable: Some(raw),
                    ..LogRead::default()
                });
            }
        };

        let mut orders = Vec::with_capacity(records.len());
        for record in &records {
            match Order::deserialize(record) {
                Ok(order) => orders.push(order),
                Err(source) => {
                    let err = StorageDecodeError {
                        key: keys::ORDER_LOG,
                        source,
                    };
                    tracing::warn!(error = %err, "skipping unreadable order record");
                }
            }
        }

        Ok(LogRead {
            records,
            orders,
            unreadable: None,
        })
    }
}
