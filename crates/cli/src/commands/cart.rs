//! Cart commands.

use bloom_core::{CartChange, ItemId};
use bloom_storefront::services::CartUpdateError;

use super::Session;

/// Print every line and the total.
pub fn show(session: &Session) {
    let cart = session.cart();
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for line in cart.lines() {
        tracing::info!(
            "{:<10} {:<20} {:>3} x {:>8} = {:>9}",
            line.item.id,
            line.item.name,
            line.quantity,
            line.item.unit_price.to_string(),
            line.line_total().to_string()
        );
    }
    tracing::info!(
        "Total: {} ({} items)",
        session.total(),
        session.item_count()
    );
}

/// Add `quantity` of an item.
///
/// # Errors
///
/// Returns `CartUpdateError` if the item is unknown, `quantity` is zero, or
/// the cart cannot be saved.
pub fn add(
    session: &mut Session,
    item_id: &ItemId,
    quantity: u32,
) -> Result<(), CartUpdateError> {
    let change = session.add_to_cart(item_id, quantity)?;
    report(session, &change);
    Ok(())
}

/// Set an item's quantity.
///
/// # Errors
///
/// Returns `CartUpdateError::Storage` if the cart cannot be saved.
pub fn update(
    session: &mut Session,
    item_id: &ItemId,
    quantity: i64,
) -> Result<(), CartUpdateError> {
    let change = session.update_quantity(item_id, quantity)?;
    report(session, &change);
    Ok(())
}

/// Remove an item's line.
///
/// # Errors
///
/// Returns `CartUpdateError::Storage` if the cart cannot be saved.
pub fn remove(session: &mut Session, item_id: &ItemId) -> Result<(), CartUpdateError> {
    let change = session.remove_from_cart(item_id)?;
    report(session, &change);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CartUpdateError::Storage` if the cart cannot be saved.
pub fn clear(session: &mut Session) -> Result<(), CartUpdateError> {
    let change = session.clear_cart()?;
    report(session, &change);
    Ok(())
}

fn report(session: &Session, change: &CartChange) {
    match change {
        CartChange::Added { item_id, quantity } => {
            tracing::info!("Added {quantity} x {item_id}");
        }
        CartChange::Incremented {
            item_id, quantity, ..
        } => tracing::info!("{item_id} now x {quantity}"),
        CartChange::QuantitySet { item_id, quantity } => {
            tracing::info!("{item_id} set to {quantity}");
        }
        CartChange::Removed { item_id } => tracing::info!("Removed {item_id}"),
        CartChange::Cleared => tracing::info!("Cart cleared"),
        CartChange::Unchanged => tracing::info!("Nothing to change"),
    }
    tracing::info!(
        "Cart: {} items, {}",
        session.item_count(),
        session.total()
    );
}
