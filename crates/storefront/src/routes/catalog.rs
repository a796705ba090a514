//! Catalog route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use bloom_core::{Item, Shop};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::CatalogQuery;
use crate::state::AppState;

/// A catalog item with the shopper's favorite flag.
#[derive(Debug, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub favorite: bool,
}

/// List every shop.
#[instrument(skip(state))]
pub async fn shops(State(state): State<AppState>) -> Json<Vec<Shop>> {
    let storefront = state.storefront().await;
    Json(storefront.catalog().shops().to_vec())
}

/// List items, filtered and sorted by the query string. Favorites come first.
#[instrument(skip(state))]
pub async fn items(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<ItemView>> {
    let storefront = state.storefront().await;
    let items = storefront
        .browse(&query)
        .into_iter()
        .map(|item| ItemView {
            favorite: storefront.is_favorite(&item.id),
            item: item.clone(),
        })
        .collect();
    Json(items)
}
