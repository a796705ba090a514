//! Checkout and order history commands.

use bloom_core::{ContactForm, Order, OrderId};
use bloom_storefront::services::CheckoutError;

use super::{CliError, Session};

/// Submit the cart. On rejection every problem is logged before failing.
///
/// # Errors
///
/// Returns `CliError::Checkout` if the order is rejected or cannot be recorded.
pub fn checkout(session: &mut Session, form: &ContactForm) -> Result<(), CliError> {
    match session.submit_order(form) {
        Ok(id) => {
            tracing::info!("Order {id} placed");
            Ok(())
        }
        Err(CheckoutError::Rejected(rejection)) => {
            if rejection.is_empty_cart() {
                tracing::error!("  cart is empty");
            }
            for field in &rejection.fields {
                tracing::error!("  {field}");
            }
            Err(CheckoutError::Rejected(rejection).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// List orders, newest first.
///
/// # Errors
///
/// Returns `CliError::Repository` if the order log cannot be read.
pub fn list(session: &Session) -> Result<(), CliError> {
    let orders = session.orders()?;
    if orders.is_empty() {
        tracing::info!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        tracing::info!(
            "{}  {}  {:>3} items  {:>9}  {}",
            order.id,
            order.submitted_at.format("%Y-%m-%d %H:%M"),
            order.item_count(),
            order.total.to_string(),
            order.shop.name
        );
    }
    Ok(())
}

/// Print one order in full.
///
/// # Errors
///
/// Returns `CliError::Lookup` if the order does not exist.
pub fn show(session: &Session, id: &OrderId) -> Result<(), CliError> {
    let order = session.order_by_id(id)?;
    print_order(&order);
    Ok(())
}

fn print_order(order: &Order) {
    tracing::info!("Order {}", order.id);
    tracing::info!("  Placed:  {}", order.submitted_at.to_rfc3339());
    tracing::info!("  Shop:    {} ({})", order.shop.name, order.shop.location);
    tracing::info!("  Name:    {}", order.contact.name);
    tracing::info!("  Email:   {}", order.contact.email);
    tracing::info!("  Phone:   {}", order.contact.phone);
    tracing::info!("  Address: {}", order.contact.address);
    for line in &order.lines {
        tracing::info!(
            "  {:<20} {:>3} x {:>8} = {:>9}",
            line.item.name,
            line.quantity,
            line.item.unit_price.to_string(),
            line.line_total().to_string()
        );
    }
    tracing::info!("  Total:   {}", order.total);
}
