use std::collections::HashMap;
use std::time::Duration;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::order::OrderView;
use crate::domain::ports::ProductCatalog;

/// Network or remote-validation failure while pushing to the secondary
/// service. Stays inside the replication pipeline: the worker logs it, the
/// checkout caller never sees it.
#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("Secondary service request failed: {0}")]
    Http(String),

    #[error("Secondary service rejected {endpoint}: status {status}")]
    RemoteRejected { endpoint: String, status: u16 },

    #[error("Catalog lookup failed during replication: {0}")]
    Catalog(String),

    #[error("Amount {0} is not representable on the remote wire")]
    Amount(BigDecimal),
}

impl From<reqwest::Error> for ReplicationError {
    fn from(e: reqwest::Error) -> Self {
        ReplicationError::Http(e.to_string())
    }
}

// Wire types of the secondary record-keeping service. It speaks JSON floats
// for money; decimals are converted at this boundary only.

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
struct RemoteItemCreate<'a> {
    name: &'a str,
    price: f64,
}

#[derive(Debug, Serialize)]
struct RemoteOrderCreate {
    item_id: i64,
    quantity: i32,
    status: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct RemoteSaleCreate {
    order_id: i64,
    total: f64,
}

pub(crate) fn remote_amount(value: &BigDecimal) -> Result<f64, ReplicationError> {
    value
        .to_f64()
        .ok_or_else(|| ReplicationError::Amount(value.clone()))
}

#[derive(Debug, Clone)]
pub struct SecondaryConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl SecondaryConfig {
    /// `SECONDARY_BASE_URL` and `REPLICATION_TIMEOUT_SECS`, with the
    /// defaults the secondary service ships with.
    pub fn from_env() -> Self {
        let base_url = std::env::var("SECONDARY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8001".to_string());
        let timeout_secs = std::env::var("REPLICATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// HTTP client for the secondary record-keeping service.
///
/// Every call carries the configured timeout so an unreachable or slow
/// secondary can never hold up its caller indefinitely.
pub struct SecondaryClient {
    http: reqwest::Client,
    base_url: String,
}

impl SecondaryClient {
    pub fn new(config: &SecondaryConfig) -> Result<Self, ReplicationError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_items(&self) -> Result<Vec<RemoteItem>, ReplicationError> {
        let resp = self
            .http
            .get(format!("{}/items", self.base_url))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ReplicationError::RemoteRejected {
                endpoint: "/items".to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ReplicationError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ReplicationError::RemoteRejected {
                endpoint: endpoint.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Find-or-create the remote item matching this product by name and
    /// current price.
    ///
    /// The lookup-then-create is not atomic remotely: two replications racing
    /// on the same product can both miss and create duplicate items. Known
    /// and left as-is; the remote's dedup semantics are undefined.
    async fn ensure_item(&self, name: &str, price: f64) -> Result<i64, ReplicationError> {
        let existing = self.get_items().await?;
        if let Some(item) = existing
            .iter()
            .find(|i| i.name == name && i.price == price)
        {
            return Ok(item.id);
        }
        let created: RemoteItem = self.post("/items", &RemoteItemCreate { name, price }).await?;
        Ok(created.id)
    }

    /// Push one committed order: ensure an item per distinct product, create
    /// one remote order per line, then one sale record carrying the order
    /// total against the first remote order.
    pub async fn sync_order(
        &self,
        order: &OrderView,
        catalog: &dyn ProductCatalog,
    ) -> Result<(), ReplicationError> {
        let mut item_mapping: HashMap<Uuid, i64> = HashMap::new();
        for item in &order.items {
            if item_mapping.contains_key(&item.product_id) {
                continue;
            }
            let product = catalog
                .find(item.product_id)
                .map_err(|e| ReplicationError::Catalog(e.to_string()))?
                .ok_or_else(|| {
                    ReplicationError::Catalog(format!(
                        "product {} referenced by order {} is gone",
                        item.product_id, order.id
                    ))
                })?;
            let remote_id = self
                .ensure_item(&product.title, remote_amount(&product.price)?)
                .await?;
            item_mapping.insert(item.product_id, remote_id);
        }

        let mut remote_order_ids = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let remote: RemoteOrder = self
                .post(
                    "/orders",
                    &RemoteOrderCreate {
                        item_id: item_mapping[&item.product_id],
                        quantity: item.quantity,
                        status: order.status.as_str(),
                    },
                )
                .await?;
            remote_order_ids.push(remote.id);
        }

        if let Some(first) = remote_order_ids.first() {
            let _: serde_json::Value = self
                .post(
                    "/sales",
                    &RemoteSaleCreate {
                        order_id: *first,
                        total: remote_amount(&order.total_amount())?,
                    },
                )
                .await?;
        }

        Ok(())
    }
}
