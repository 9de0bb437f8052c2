use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::{Cart, CART_SESSION_KEY};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    CheckoutLine, NewOrderInput, OrderItemView, OrderList, OrderStatus, OrderView,
};
use crate::domain::ports::{OrderStore, ProductCatalog, SessionCarts};
use crate::domain::product::ProductView;

#[derive(Default)]
struct Inner {
    products: BTreeMap<Uuid, ProductView>,
    orders: Vec<OrderView>,
}

/// In-memory implementation of the catalog and order store.
///
/// Backs the test suite and local runs without Postgres. A single store lock
/// makes `checkout` atomic, giving the same cannot-over-draw guarantee the
/// Diesel store gets from its guarded decrement.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
    }

    /// Seeding helper for tests and local runs.
    pub fn seed_product(&self, title: &str, price: &str, inventory: i32) -> Uuid {
        let id = Uuid::new_v4();
        let product = ProductView {
            id,
            category_id: Uuid::new_v4(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            description: String::new(),
            price: BigDecimal::from_str(price).expect("seed price must be a valid decimal"),
            inventory,
            is_active: true,
        };
        self.inner
            .lock()
            .expect("store lock poisoned")
            .products
            .insert(id, product);
        id
    }

    /// Seeding helper: drop a product, simulating catalog deletion between
    /// cart add and later reads.
    pub fn delete_product(&self, id: Uuid) {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .products
            .remove(&id);
    }
}

impl ProductCatalog for InMemoryStore {
    fn find(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<ProductView>, DomainError> {
        let inner = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.get(id).cloned())
            .collect())
    }

    fn list_products(&self, query: Option<&str>) -> Result<Vec<ProductView>, DomainError> {
        let inner = self.lock()?;
        let needle = query.map(str::to_lowercase);
        let mut out: Vec<ProductView> = inner
            .products
            .values()
            .filter(|p| match &needle {
                Some(n) => p.title.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(out)
    }

    fn set_inventory(&self, id: Uuid, inventory: i32) -> Result<ProductView, DomainError> {
        let mut inner = self.lock()?;
        let product = inner.products.get_mut(&id).ok_or(DomainError::NotFound)?;
        product.inventory = inventory;
        Ok(product.clone())
    }

    fn add_inventory(&self, id: Uuid, delta: i32) -> Result<ProductView, DomainError> {
        let mut inner = self.lock()?;
        let product = inner.products.get_mut(&id).ok_or(DomainError::NotFound)?;
        product.inventory += delta;
        Ok(product.clone())
    }
}

impl OrderStore for InMemoryStore {
    fn checkout(
        &self,
        input: NewOrderInput,
        lines: Vec<CheckoutLine>,
    ) -> Result<OrderView, DomainError> {
        let mut inner = self.lock()?;

        // Validate every line against current stock before mutating anything;
        // under the store lock this is equivalent to per-line
        // check-then-decrement with rollback.
        for line in &lines {
            let product = inner
                .products
                .get(&line.product_id)
                .ok_or(DomainError::NotFound)?;
            if line.quantity > product.inventory {
                return Err(DomainError::InsufficientInventory {
                    product_id: product.id,
                    title: product.title.clone(),
                    available: product.inventory,
                });
            }
        }

        let order_id = Uuid::new_v4();
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            if let Some(product) = inner.products.get_mut(&line.product_id) {
                product.inventory -= line.quantity;
            }
            items.push(OrderItemView {
                id: Uuid::new_v4(),
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price.clone(),
            });
        }

        let order = OrderView {
            id: order_id,
            customer: input.customer,
            shipping: input.shipping,
            paid: false,
            status: OrderStatus::New,
            created_at: Utc::now(),
            items,
        };
        inner.orders.push(order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.lock()?.orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, page: i64, limit: i64) -> Result<OrderList, DomainError> {
        let inner = self.lock()?;
        let total = inner.orders.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;
        let items = inner
            .orders
            .iter()
            .rev() // newest first, as the SQL store orders by created_at desc
            .skip(offset)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(OrderList { items, total })
    }
}

/// In-memory session store: session id to an opaque key/value map, with the
/// serialized cart under `CART_SESSION_KEY`. A missing session or missing
/// cart key loads as an empty cart.
#[derive(Default)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, HashMap<String, serde_json::Value>>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionCarts for InMemorySessions {
    fn load(&self, session_id: &str) -> Result<Cart, DomainError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| DomainError::Internal("session lock poisoned".to_string()))?;
        match sessions
            .get(session_id)
            .and_then(|kv| kv.get(CART_SESSION_KEY))
        {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| DomainError::Internal(format!("Corrupt session cart: {e}"))),
            None => Ok(Cart::new()),
        }
    }

    fn save(&self, session_id: &str, cart: &Cart) -> Result<(), DomainError> {
        let value = serde_json::to_value(cart)
            .map_err(|e| DomainError::Internal(format!("Cart serialization failed: {e}")))?;
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| DomainError::Internal("session lock poisoned".to_string()))?;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(CART_SESSION_KEY.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;
    use crate::domain::order::{Customer, ShippingInfo};

    fn order_input() -> NewOrderInput {
        NewOrderInput {
            customer: Customer::Guest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            shipping: ShippingInfo {
                name: "Ada".to_string(),
                address1: "1 Main St".to_string(),
                address2: String::new(),
                city: "Manila".to_string(),
                postal_code: "1000".to_string(),
                country: "Philippines".to_string(),
            },
        }
    }

    #[test]
    fn concurrent_checkouts_never_overdraw_stock() {
        let store = Arc::new(InMemoryStore::new());
        let product = store.seed_product("Limited", "10.00", 5);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    store.checkout(
                        order_input(),
                        vec![CheckoutLine {
                            product_id: product,
                            quantity: 3,
                            unit_price: BigDecimal::from_str("10.00").unwrap(),
                        }],
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one of the two checkouts may win");
        assert!(results.iter().any(|r| matches!(
            r,
            Err(DomainError::InsufficientInventory { available: 2, .. })
        )));
        assert_eq!(store.find(product).unwrap().unwrap().inventory, 2);
    }

    #[test]
    fn checkout_with_unknown_product_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .checkout(
                order_input(),
                vec![CheckoutLine {
                    product_id: Uuid::new_v4(),
                    quantity: 1,
                    unit_price: BigDecimal::from_str("1.00").unwrap(),
                }],
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn list_is_newest_first_and_paginated() {
        let store = InMemoryStore::new();
        let product = store.seed_product("Mug", "5.00", 100);
        let mut ids = Vec::new();
        for _ in 0..5 {
            let order = store
                .checkout(
                    order_input(),
                    vec![CheckoutLine {
                        product_id: product,
                        quantity: 1,
                        unit_price: BigDecimal::from_str("5.00").unwrap(),
                    }],
                )
                .unwrap();
            ids.push(order.id);
        }

        let page1 = store.list(1, 3).unwrap();
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);
        assert_eq!(page1.items[0].id, ids[4]);

        let page2 = store.list(2, 3).unwrap();
        assert_eq!(page2.items.len(), 2);
        assert_eq!(page2.items[1].id, ids[0]);
    }

    #[test]
    fn missing_session_loads_an_empty_cart() {
        let sessions = InMemorySessions::new();
        assert!(sessions.load("nobody").unwrap().is_empty());
    }

    #[test]
    fn saved_cart_round_trips_through_the_session_store() {
        let store = InMemoryStore::new();
        let product = store.seed_product("Mug", "9.99", 5);
        let sessions = InMemorySessions::new();

        let mut cart = Cart::new();
        cart.add(&store.find(product).unwrap().unwrap(), 2, false);
        sessions.save("sid", &cart).unwrap();

        assert_eq!(sessions.load("sid").unwrap(), cart);
    }
}
