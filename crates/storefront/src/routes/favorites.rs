//! Favorites route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use bloom_core::ItemId;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Result of a toggle.
#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub item_id: ItemId,
    pub favorite: bool,
}

/// List favorited item IDs.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<ItemId>> {
    let storefront = state.storefront().await;
    Json(storefront.favorites().to_vec())
}

/// Flip an item's favorite flag.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<FavoriteStatus>> {
    let mut storefront = state.storefront().await;
    let favorite = storefront.toggle_favorite(&item_id)?;
    Ok(Json(FavoriteStatus { item_id, favorite }))
}
