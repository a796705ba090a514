//! Checkout: turning the cart and contact details into an order.

use std::collections::HashSet;
use std::fmt;

use bloom_core::{Cart, ContactForm, FieldError, Order, OrderId, Shop, ShopId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::Storefront;
use crate::catalog::Catalog;
use crate::repository::{OrderLogRepository, RepositoryError};
use crate::storage::KeyValueStore;

/// Why a checkout was refused. Contact and cart problems are reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Every invalid contact field.
    pub fields: Vec<FieldError>,
    /// The cart had no lines.
    pub empty_cart: bool,
}

impl Rejection {
    /// Whether any contact field was invalid.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Whether the cart was empty.
    #[must_use]
    pub const fn is_empty_cart(&self) -> bool {
        self.empty_cart
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("order rejected")?;
        let mut sep = ": ";
        if self.empty_cart {
            write!(f, "{sep}cart is empty")?;
            sep = "; ";
        }
        for field in &self.fields {
            write!(f, "{sep}{field}")?;
            sep = "; ";
        }
        Ok(())
    }
}

impl std::error::Error for Rejection {}

/// Checkout error type.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The submission was invalid. Nothing was written.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The order log could not be read or written. The cart is untouched.
    #[error("failed to record order: {0}")]
    Storage(#[from] RepositoryError),
}

impl<S: KeyValueStore> Storefront<S> {
    /// Submit the cart as an order, stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`Storefront::submit_order_at`].
    pub fn submit_order(&mut self, form: &ContactForm) -> Result<OrderId, CheckoutError> {
        self.submit_order_at(form, Utc::now())
    }

    /// Submit the cart as an order placed at `submitted_at`.
    ///
    /// On success the order is in the log and the cart is empty. The log
    /// append and the cart clear are separate writes; if the process dies
    /// between them the order is recorded but the saved cart still holds
    /// its lines.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Rejected` if any contact field is invalid or
    /// the cart is empty, and `CheckoutError::Storage` if the order could not
    /// be appended to the log. The cart is unchanged in both cases.
    pub fn submit_order_at(
        &mut self,
        form: &ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> Result<OrderId, CheckoutError> {
        let empty_cart = self.cart.is_empty();
        let contact = match form.validate() {
            Ok(contact) if !empty_cart => contact,
            Ok(_) => {
                return Err(Rejection {
                    fields: Vec::new(),
                    empty_cart,
                }
                .into());
            }
            Err(fields) => return Err(Rejection { fields, empty_cart }.into()),
        };

        let shop = attribute_shop(&self.catalog, self.default_shop.as_ref(), &self.cart).clone();
        let cart = &self.cart;
        let order = OrderLogRepository::new(&self.store).append_with(|log| {
            let id = allocate_id(log, submitted_at);
            Order::from_cart(id, cart, contact, shop, submitted_at)
        })?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            items = order.item_count(),
            shop = %order.shop.id,
            "order submitted"
        );

        // The order is already recorded, so a failed cart write is not rolled back.
        let change = self.cart.clear();
        if let Err(e) = self.save_cart() {
            tracing::error!(
                error = %e,
                order_id = %order.id,
                "order recorded but cart not saved as empty"
            );
        }
        self.notify(&change);

        Ok(order.id)
    }
}

/// Epoch milliseconds of `submitted_at`, bumped past any ID already in `log`.
fn allocate_id(log: &[Order], submitted_at: DateTime<Utc>) -> OrderId {
    let taken: HashSet<&OrderId> = log.iter().map(|order| &order.id).collect();
    let mut millis = submitted_at.timestamp_millis();
    loop {
        let id = OrderId::from_millis(millis);
        if !taken.contains(&id) {
            return id;
        }
        millis = millis.saturating_add(1);
    }
}

/// The shop of the first line's item, else the default shop, else the catalog's first.
fn attribute_shop<'c>(
    catalog: &'c Catalog,
    default_shop: Option<&ShopId>,
    cart: &Cart,
) -> &'c Shop {
    cart.lines()
        .first()
        .and_then(|line| catalog.shop(&line.item.shop_id))
        .or_else(|| default_shop.and_then(|id| catalog.shop(id)))
        .unwrap_or_else(|| catalog.primary_shop())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bloom_core::{ContactField, ItemId};
    use chrono::TimeZone;

    use super::*;
    use crate::storage::MemoryStore;

    fn storefront() -> Storefront<Arc<MemoryStore>> {
        Storefront::open(Arc::new(MemoryStore::new()), Arc::new(Catalog::demo())).unwrap()
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Ivy Green".to_string(),
            email: "ivy@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Fern Lane".to_string(),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_reports_email_and_empty_cart_together() {
        let mut sf = storefront();
        let bad = ContactForm {
            email: "not-an-email".to_string(),
            ..form()
        };

        let err = sf.submit_order(&bad).unwrap_err();
        let CheckoutError::Rejected(rejection) = err else {
            panic!("expected rejection");
        };
        assert!(rejection.is_empty_cart());
        assert!(rejection.is_validation_error());
        assert_eq!(rejection.fields.len(), 1);
        assert_eq!(rejection.fields[0].field, ContactField::Email);
        assert!(sf.orders().unwrap().is_empty());
    }

    #[test]
    fn test_blank_email_and_empty_cart() {
        let mut sf = storefront();
        let no_email = ContactForm {
            email: String::new(),
            ..form()
        };

        let Err(CheckoutError::Rejected(rejection)) = sf.submit_order(&no_email) else {
            panic!("expected rejection");
        };
        assert!(rejection.empty_cart);
        assert_eq!(rejection.fields.len(), 1);
        assert_eq!(rejection.fields[0].field, ContactField::Email);
        assert_eq!(rejection.fields[0].message, "email is required");
        assert!(sf.orders().unwrap().is_empty());
    }

    #[test]
    fn test_empty_cart_alone_is_rejected() {
        let mut sf = storefront();
        let err = sf.submit_order(&form()).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Rejected(Rejection { ref fields, empty_cart: true }) if fields.is_empty()
        ));
        assert_eq!(err.to_string(), "order rejected: cart is empty");
    }

    #[test]
    fn test_invalid_contact_keeps_cart() {
        let mut sf = storefront();
        sf.add_to_cart(&ItemId::new("rose-1"), 1).unwrap();
        let blank = ContactForm::default();

        let err = sf.submit_order(&blank).unwrap_err();
        let CheckoutError::Rejected(rejection) = err else {
            panic!("expected rejection");
        };
        assert!(!rejection.is_empty_cart());
        assert_eq!(rejection.fields.len(), 4);
        assert_eq!(sf.item_count(), 1);
    }

    #[test]
    fn test_submission_snapshots_and_clears_cart() {
        let mut sf = storefront();
        sf.add_to_cart(&ItemId::new("tulip-1"), 2).unwrap();
        sf.add_to_cart(&ItemId::new("rose-1"), 1).unwrap();
        let total_before = sf.total();

        let id = sf.submit_order_at(&form(), noon()).unwrap();

        assert_eq!(id, OrderId::from_millis(noon().timestamp_millis()));
        assert!(sf.cart().is_empty());

        let order = sf.order_by_id(&id).unwrap();
        assert_eq!(order.total, total_before);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.submitted_at, noon());
        assert_eq!(order.shop.id, ShopId::new("bloomwell"));
        assert_eq!(order.contact.email.as_str(), "ivy@example.com");

        sf.add_to_cart(&ItemId::new("lily-2"), 4).unwrap();
        assert_eq!(sf.order_by_id(&id).unwrap().total, total_before);
    }

    #[test]
    fn test_same_millisecond_ids_are_bumped() {
        let mut sf = storefront();
        let mut ids = Vec::new();
        for _ in 0..3 {
            sf.add_to_cart(&ItemId::new("daisy-1"), 1).unwrap();
            ids.push(sf.submit_order_at(&form(), noon()).unwrap());
        }

        let base = noon().timestamp_millis();
        assert_eq!(
            ids,
            [
                OrderId::from_millis(base),
                OrderId::from_millis(base + 1),
                OrderId::from_millis(base + 2),
            ]
        );
        assert_eq!(sf.orders().unwrap().len(), 3);
    }

    #[test]
    fn test_shop_falls_back_to_default() {
        let catalog = Catalog::demo();
        let empty = Cart::new();
        let bloomwell = ShopId::new("bloomwell");

        assert_eq!(
            attribute_shop(&catalog, Some(&bloomwell), &empty).id,
            bloomwell
        );
        assert_eq!(
            attribute_shop(&catalog, None, &empty).id,
            ShopId::new("flowery-fragrant")
        );

        let mut cart = Cart::new();
        cart.add(catalog.item(&ItemId::new("rose-2")).unwrap(), 1).unwrap();
        assert_eq!(
            attribute_shop(&catalog, Some(&bloomwell), &cart).id,
            ShopId::new("flowery-fragrant")
        );
    }
}
