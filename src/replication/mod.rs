//! Best-effort replication of committed orders to the secondary
//! record-keeping service. Logically independent of checkout: orders are
//! handed to an async worker over a channel after commit, failures are logged
//! and never propagated.

pub mod client;
pub mod worker;

pub use client::{ReplicationError, SecondaryClient, SecondaryConfig};
pub use worker::{channel, ChannelSink, ReplicationWorker};
