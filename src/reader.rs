//! Pull-based, closable sequence of record batches
//!
//! `ShardReader` wraps a [`ShardTraversal`] and turns its pulls into a
//! sequence the caller drains at its own pace. Closing the reader is final:
//! every later pull returns `None` without reaching the transport.
//!
//! # Examples
//!
//! ```rust,no_run
//! use kinesis_shard_reader::{ReaderConfig, ShardReader};
//! use std::time::Duration;
//!
//! async fn tail(stream: &str) -> Result<(), kinesis_shard_reader::ReaderError> {
//!     let config = ReaderConfig::new(stream)
//!         .with_looping(true)
//!         .with_read_pause(Duration::from_millis(200));
//!
//!     let (mut reader, _monitoring_rx) = ShardReader::from_env(config).await?;
//!
//!     while let Some(batch) = reader.pull().await {
//!         for record in batch? {
//!             println!("{}", record.sequence_number());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use crate::{
    client::KinesisClientTrait,
    config::ReaderConfig,
    error::Result,
    monitoring::ReaderEvent,
    traversal::{ShardTraversal, StreamState, TraversalPhase},
};
use aws_sdk_kinesis::types::Record;
use futures::Stream;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};

/// Cloneable handle that closes a reader from anywhere
#[derive(Debug, Clone)]
pub struct CloseHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CloseHandle {
    /// Close the reader. Calling this more than once has no further effect.
    pub fn close(&self) {
        let was_closed = self.tx.send_replace(true);
        if !was_closed {
            info!("Shard reader closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receiver that observes the close signal
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Round-robin record reader over all shards of a stream
pub struct ShardReader<C> {
    traversal: ShardTraversal<C>,
    close: CloseHandle,
}

impl<C> ShardReader<C>
where
    C: KinesisClientTrait,
{
    /// Creates a new reader
    ///
    /// Returns the reader and, when monitoring is enabled, the receiving end of
    /// its event channel.
    pub fn new(
        client: C,
        config: ReaderConfig,
    ) -> Result<(Self, Option<mpsc::Receiver<ReaderEvent>>)> {
        config.validate()?;

        let (monitoring_tx, monitoring_rx) = if config.monitoring.enabled {
            let (tx, rx) = mpsc::channel(config.monitoring.channel_size);
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        debug!(
            stream = %config.stream_name,
            allow_looping = config.allow_looping,
            position = ?config.initial_position,
            "Creating shard reader"
        );

        let (close_tx, _) = watch::channel(false);
        let reader = Self {
            traversal: ShardTraversal::new(client, config, monitoring_tx),
            close: CloseHandle {
                tx: Arc::new(close_tx),
            },
        };

        Ok((reader, monitoring_rx))
    }

    /// Pull the next batch of records.
    ///
    /// Returns `None` once the reader is closed. A failed pull does not close
    /// the reader; the caller decides whether to keep pulling.
    pub async fn pull(&mut self) -> Option<Result<Vec<Record>>> {
        if self.close.is_closed() {
            trace!(stream = %self.traversal.state().stream_name(), "Pull after close");
            return None;
        }

        Some(self.traversal.next_batch().await)
    }

    pub fn close(&self) {
        self.close.close();
    }

    pub fn is_closed(&self) -> bool {
        self.close.is_closed()
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    pub fn state(&self) -> &StreamState {
        self.traversal.state()
    }

    pub fn phase(&self) -> TraversalPhase {
        self.traversal.phase()
    }

    /// Consume the reader as a `Stream` of record batches.
    ///
    /// The stream ends when the reader is closed through its [`CloseHandle`].
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<Record>>> {
        futures::stream::unfold(self, |mut reader| async move {
            let batch = reader.pull().await?;
            Some((batch, reader))
        })
    }
}

impl ShardReader<aws_sdk_kinesis::Client> {
    /// Creates a reader backed by an SDK client built from the ambient AWS
    /// configuration (environment, profile, instance metadata).
    pub async fn from_env(
        config: ReaderConfig,
    ) -> Result<(Self, Option<mpsc::Receiver<ReaderEvent>>)> {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(aws_sdk_kinesis::Client::new(&sdk_config), config)
    }
}
