use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductCatalog, SessionCarts};
use crate::domain::product::ProductView;

/// One cart entry joined with its live catalog product.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: ProductView,
    pub quantity: i32,
    /// Price snapshot from add-time, not the product's current price.
    pub price: BigDecimal,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CartDetail {
    pub lines: Vec<CartLine>,
    pub total_price: BigDecimal,
    pub total_quantity: i64,
}

/// Session-backed cart operations: every mutation loads the cart, applies the
/// change, and persists it back under the session's cart key.
pub struct CartService {
    catalog: Arc<dyn ProductCatalog>,
    sessions: Arc<dyn SessionCarts>,
}

impl CartService {
    pub fn new(catalog: Arc<dyn ProductCatalog>, sessions: Arc<dyn SessionCarts>) -> Self {
        Self { catalog, sessions }
    }

    /// Add `quantity` of a product to the session's cart. With `update` the
    /// quantity is set instead of incremented. Fails with `NotFound` when the
    /// product does not exist.
    pub fn add(
        &self,
        session_id: &str,
        product_id: Uuid,
        quantity: i32,
        update: bool,
    ) -> Result<Cart, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        let product = self
            .catalog
            .find(product_id)?
            .ok_or(DomainError::NotFound)?;

        let mut cart = self.sessions.load(session_id)?;
        cart.add(&product, quantity, update);
        self.sessions.save(session_id, &cart)?;
        Ok(cart)
    }

    /// Remove a product from the cart. Absent entries are a no-op.
    pub fn remove(&self, session_id: &str, product_id: Uuid) -> Result<Cart, DomainError> {
        let mut cart = self.sessions.load(session_id)?;
        cart.remove(product_id);
        self.sessions.save(session_id, &cart)?;
        Ok(cart)
    }

    pub fn clear(&self, session_id: &str) -> Result<(), DomainError> {
        let mut cart = self.sessions.load(session_id)?;
        cart.clear();
        self.sessions.save(session_id, &cart)
    }

    pub fn cart(&self, session_id: &str) -> Result<Cart, DomainError> {
        self.sessions.load(session_id)
    }

    /// The cart joined with live products. Entries whose product has vanished
    /// from the catalog are skipped; the cart-wide totals still cover every
    /// stored entry.
    pub fn detail(&self, session_id: &str) -> Result<CartDetail, DomainError> {
        let cart = self.sessions.load(session_id)?;
        let ids: Vec<Uuid> = cart.entries().map(|(id, _)| *id).collect();
        let products = self.catalog.find_many(&ids)?;

        let mut lines = Vec::with_capacity(products.len());
        for (id, entry) in cart.entries() {
            match products.iter().find(|p| p.id == *id) {
                Some(product) => lines.push(CartLine {
                    product: product.clone(),
                    quantity: entry.quantity,
                    price: entry.price.clone(),
                    total_price: entry.total_price(),
                }),
                None => {
                    log::debug!("cart entry for missing product {} skipped", id);
                }
            }
        }

        Ok(CartDetail {
            lines,
            total_price: cart.total_price(),
            total_quantity: cart.len(),
        })
    }
}
