use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::{DomainError, FieldError};
use crate::domain::order::{CheckoutLine, Customer, NewOrderInput, OrderView, ShippingInfo};
use crate::domain::ports::{OrderStore, ProductCatalog, ReplicationSink, SessionCarts};

/// Shipping/contact data captured from the checkout form. `email` is required
/// for guests, optional for authenticated users.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl CheckoutForm {
    /// Field-by-field validation; errors are collected, not short-circuited.
    fn validate(&self, user: Option<Uuid>) -> Result<(), DomainError> {
        let mut errors = Vec::new();
        let required = [
            ("name", &self.name),
            ("address1", &self.address1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "This field is required"));
            }
        }
        if user.is_none() {
            if self.email.trim().is_empty() {
                errors.push(FieldError::new("email", "This field is required"));
            } else if !self.email.contains('@') {
                errors.push(FieldError::new("email", "Enter a valid email address"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    fn shipping(&self) -> ShippingInfo {
        ShippingInfo {
            name: self.name.trim().to_string(),
            address1: self.address1.trim().to_string(),
            address2: self.address2.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// Converts a session's cart into a persisted order.
///
/// The stock check and inventory decrement happen inside the order store's
/// atomic `checkout`; this service owns everything around it: the empty-cart
/// guard, form validation, clearing the cart on success, and handing the
/// committed order to the replication sink. Cart entries whose product has
/// vanished from the catalog are skipped, the same policy cart iteration
/// applies; the order commits with the surviving lines. On any store error
/// the cart and session are left untouched so the user can retry.
pub struct CheckoutService {
    catalog: Arc<dyn ProductCatalog>,
    sessions: Arc<dyn SessionCarts>,
    orders: Arc<dyn OrderStore>,
    replication: Arc<dyn ReplicationSink>,
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        sessions: Arc<dyn SessionCarts>,
        orders: Arc<dyn OrderStore>,
        replication: Arc<dyn ReplicationSink>,
    ) -> Self {
        Self {
            catalog,
            sessions,
            orders,
            replication,
        }
    }

    pub fn checkout(
        &self,
        session_id: &str,
        user: Option<Uuid>,
        form: &CheckoutForm,
    ) -> Result<OrderView, DomainError> {
        let mut cart = self.sessions.load(session_id)?;
        if cart.len() == 0 {
            return Err(DomainError::EmptyCart);
        }
        form.validate(user)?;

        let customer = match user {
            Some(id) => Customer::Registered(id),
            None => Customer::Guest {
                name: form.name.trim().to_string(),
                email: form.email.trim().to_string(),
            },
        };
        let input = NewOrderInput {
            customer,
            shipping: form.shipping(),
        };
        let ids: Vec<Uuid> = cart.entries().map(|(id, _)| *id).collect();
        let products = self.catalog.find_many(&ids)?;
        let lines: Vec<CheckoutLine> = cart
            .entries()
            .filter_map(|(id, entry)| {
                if products.iter().any(|p| p.id == *id) {
                    Some(CheckoutLine {
                        product_id: *id,
                        quantity: entry.quantity,
                        unit_price: entry.price.clone(),
                    })
                } else {
                    log::debug!("cart entry for missing product {} skipped at checkout", id);
                    None
                }
            })
            .collect();

        let order = self.orders.checkout(input, lines)?;

        cart.clear();
        self.sessions.save(session_id, &cart)?;

        self.replication.enqueue(order.clone());
        Ok(order)
    }
}
