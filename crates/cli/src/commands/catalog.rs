//! Catalog listing.

use bloom_core::ShopId;
use bloom_storefront::catalog::{CatalogQuery, SortKey, SortOrder};

use super::Session;

/// List items, favorites first. A `*` marks favorites.
pub fn list(session: &Session, shop: Option<String>, sort: SortKey, desc: bool) {
    let query = CatalogQuery {
        shop: shop.map(ShopId::from),
        sort,
        order: if desc { SortOrder::Desc } else { SortOrder::Asc },
    };

    let items = session.browse(&query);
    if items.is_empty() {
        tracing::info!("No items found");
        return;
    }

    for item in items {
        let marker = if session.is_favorite(&item.id) { "*" } else { " " };
        tracing::info!(
            "{marker} {:<10} {:<20} {:>8}  {}",
            item.id,
            item.name,
            item.unit_price.to_string(),
            item.shop_id
        );
    }
}
