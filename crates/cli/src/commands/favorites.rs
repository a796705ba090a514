//! Favorites commands.

use bloom_core::ItemId;
use bloom_storefront::services::FavoriteError;

use super::Session;

/// List favorites with their names.
pub fn list(session: &Session) {
    if session.favorites().is_empty() {
        tracing::info!("No favorites yet");
        return;
    }
    for id in session.favorites() {
        let name = session
            .catalog()
            .item(id)
            .map_or("(no longer in catalog)", |item| item.name.as_str());
        tracing::info!("{id:<10} {name}");
    }
}

/// Flip an item's favorite flag.
///
/// # Errors
///
/// Returns `FavoriteError` if the item is not in the catalog or the change
/// cannot be saved.
pub fn toggle(session: &mut Session, item_id: &ItemId) -> Result<(), FavoriteError> {
    if session.toggle_favorite(item_id)? {
        tracing::info!("{item_id} added to favorites");
    } else {
        tracing::info!("{item_id} removed from favorites");
    }
    Ok(())
}
