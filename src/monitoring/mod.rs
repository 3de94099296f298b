//! Monitoring events emitted while traversing a stream
//!
//! When enabled, the reader hands back an `mpsc::Receiver<ReaderEvent>` that
//! reports discovery, shard selection, iterator acquisition, fetched batches
//! and throttling.

mod types;

pub use types::{MonitoringConfig, ReaderEvent, ReaderEventType};
