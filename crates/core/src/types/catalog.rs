//! Catalog records: items for sale and the shops that sell them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ItemId, ShopId};
use super::price::Price;

/// A shop that items are sold from and orders are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    /// Street address shown on order confirmations.
    pub location: String,
}

/// An item in the catalog.
///
/// Items are immutable once published. Cart lines keep a copy taken at add
/// time so a stored cart or order can be displayed without the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Price,
    pub shop_id: ShopId,
    pub description: String,
    /// Path of the product photo, relative to the static asset root.
    pub image: String,
    pub created_at: DateTime<Utc>,
}
