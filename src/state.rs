use std::sync::Arc;

use crate::application::cart_service::CartService;
use crate::application::checkout::CheckoutService;
use crate::domain::ports::{OrderStore, ProductCatalog, ReplicationSink, SessionCarts};

/// Shared handler state: the ports plus the services wired on top of them.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn ProductCatalog>,
    pub orders: Arc<dyn OrderStore>,
    pub carts: Arc<CartService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppContext {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        orders: Arc<dyn OrderStore>,
        sessions: Arc<dyn SessionCarts>,
        replication: Arc<dyn ReplicationSink>,
    ) -> Self {
        let carts = Arc::new(CartService::new(catalog.clone(), sessions.clone()));
        let checkout = Arc::new(CheckoutService::new(
            catalog.clone(),
            sessions,
            orders.clone(),
            replication,
        ));
        Self {
            catalog,
            orders,
            carts,
            checkout,
        }
    }
}
