use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::domain::order::OrderView;
use crate::domain::ports::{ProductCatalog, ReplicationSink};

use super::client::SecondaryClient;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Producer half: hands committed orders to the replication worker without
/// blocking. A closed channel (worker gone) is logged and dropped — checkout
/// semantics never depend on this path.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OrderView>,
}

impl ReplicationSink for ChannelSink {
    fn enqueue(&self, order: OrderView) {
        let id = order.id;
        if self.tx.send(order).is_err() {
            log::error!("replication worker is gone; dropping order {}", id);
        }
    }
}

/// Consumer half: drains the channel and pushes each order to the secondary
/// service with bounded retries. Every failure is logged and swallowed.
pub struct ReplicationWorker {
    rx: mpsc::UnboundedReceiver<OrderView>,
    client: SecondaryClient,
    catalog: Arc<dyn ProductCatalog>,
}

pub fn channel(
    client: SecondaryClient,
    catalog: Arc<dyn ProductCatalog>,
) -> (ChannelSink, ReplicationWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, ReplicationWorker { rx, client, catalog })
}

impl ReplicationWorker {
    pub async fn run(mut self) {
        while let Some(order) = self.rx.recv().await {
            self.replicate(order).await;
        }
        log::info!("replication channel closed; worker exiting");
    }

    async fn replicate(&self, order: OrderView) {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.sync_order(&order, self.catalog.as_ref()).await {
                Ok(()) => {
                    log::info!("order {} replicated to secondary service", order.id);
                    return;
                }
                Err(e) => {
                    log::warn!(
                        "replicating order {} failed (attempt {}/{}): {}",
                        order.id,
                        attempt,
                        MAX_ATTEMPTS,
                        e
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }
        log::error!(
            "giving up on replicating order {} after {} attempts",
            order.id,
            MAX_ATTEMPTS
        );
    }
}
