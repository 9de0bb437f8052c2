use uuid::Uuid;

use super::cart::Cart;
use super::errors::DomainError;
use super::order::{CheckoutLine, NewOrderInput, OrderList, OrderView};
use super::product::ProductView;

/// Read access to the product catalog, plus the inventory adjustments the
/// management CLI needs.
pub trait ProductCatalog: Send + Sync + 'static {
    fn find(&self, id: Uuid) -> Result<Option<ProductView>, DomainError>;
    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<ProductView>, DomainError>;
    /// Products matching `query` as a case-insensitive title substring; all
    /// products when `query` is `None`. Ordered by title.
    fn list_products(&self, query: Option<&str>) -> Result<Vec<ProductView>, DomainError>;
    fn set_inventory(&self, id: Uuid, inventory: i32) -> Result<ProductView, DomainError>;
    fn add_inventory(&self, id: Uuid, delta: i32) -> Result<ProductView, DomainError>;
}

/// Persistence for orders. `checkout` is the single atomic unit described in
/// the checkout flow: it must either commit the order, its items, and every
/// inventory decrement together, or leave no trace.
pub trait OrderStore: Send + Sync + 'static {
    fn checkout(
        &self,
        input: NewOrderInput,
        lines: Vec<CheckoutLine>,
    ) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<OrderList, DomainError>;
}

/// Opaque per-session key-value storage for carts. A missing cart loads as an
/// empty one; saving persists the serialized cart under its well-known key.
pub trait SessionCarts: Send + Sync + 'static {
    fn load(&self, session_id: &str) -> Result<Cart, DomainError>;
    fn save(&self, session_id: &str, cart: &Cart) -> Result<(), DomainError>;
}

/// Fire-and-forget hand-off of a committed order to the replication pipeline.
/// Must never block and never fail the caller.
pub trait ReplicationSink: Send + Sync + 'static {
    fn enqueue(&self, order: OrderView);
}
