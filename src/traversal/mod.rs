//! Shard traversal engine
//!
//! Drives a single stream through discovery, shard selection, iterator
//! acquisition and record pulls. The engine is a state machine:
//!
//! - `Undiscovered`: the shard list has not been fetched yet
//! - `Discovered`: shards are known but none is selected
//! - `Selecting`: a shard is selected and its iterator is pending
//! - `Pulling`: the selected shard holds a live iterator
//! - `ShardEnded`: the selected shard was closed, cycle before the next pull
//! - `Exhausted`: cycling ran past the last shard with looping disabled
//!
//! Every operation takes `&mut self`, so at most one remote call is in flight.

mod cursor;
mod directory;
mod records;
mod state;

pub use state::StreamState;

use crate::{
    client::KinesisClientTrait,
    config::ReaderConfig,
    error::{ReaderError, Result},
    monitoring::ReaderEvent,
};
use aws_sdk_kinesis::types::Record;
use tokio::sync::mpsc;
use tracing::{debug, error, trace, warn};

/// Where the traversal currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPhase {
    Undiscovered,
    Discovered,
    Selecting,
    Pulling,
    ShardEnded,
    Exhausted,
}

/// Round-robin reader over the shards of one stream
pub struct ShardTraversal<C> {
    client: C,
    config: ReaderConfig,
    state: StreamState,
    phase: TraversalPhase,
    monitoring_tx: Option<mpsc::Sender<ReaderEvent>>,
}

impl<C> ShardTraversal<C>
where
    C: KinesisClientTrait,
{
    pub fn new(
        client: C,
        config: ReaderConfig,
        monitoring_tx: Option<mpsc::Sender<ReaderEvent>>,
    ) -> Self {
        Self {
            client,
            state: StreamState::new(config.stream_name.clone()),
            config,
            phase: TraversalPhase::Undiscovered,
            monitoring_tx,
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn phase(&self) -> TraversalPhase {
        self.phase
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Fetch the next batch of records.
    ///
    /// The first call discovers the shards and selects the first one. A
    /// throttled read is absorbed: the engine cycles to the next shard and
    /// returns an empty batch. Every other failure is returned unchanged.
    pub async fn next_batch(&mut self) -> Result<Vec<Record>> {
        match self.advance().await {
            Err(e) if e.is_throttling() && self.state.is_discovered() => {
                self.recover_from_throttling(e).await
            }
            result => result,
        }
    }

    async fn advance(&mut self) -> Result<Vec<Record>> {
        match self.phase {
            TraversalPhase::Undiscovered => {
                self.discover_shards().await?;
                self.cycle().await?;
            }
            TraversalPhase::Discovered | TraversalPhase::ShardEnded => self.cycle().await?,
            TraversalPhase::Selecting => self.acquire_cursor().await?,
            TraversalPhase::Pulling => {}
            TraversalPhase::Exhausted => return Err(self.exhausted_error()),
        }

        self.pull_records().await
    }

    async fn recover_from_throttling(&mut self, err: ReaderError) -> Result<Vec<Record>> {
        warn!(
            stream = %self.state.stream_name(),
            shard_id = ?self.state.current_shard_id(),
            error = %err,
            "Read throttled, cycling to the next shard"
        );

        self.send_event(ReaderEvent::throttled(
            self.state.stream_name(),
            self.state.current_shard_id(),
            err.to_string(),
        ));

        match self.cycle().await {
            Ok(()) => Ok(Vec::new()),
            // The new shard stays in `Selecting`; the next pull retries its iterator.
            Err(e) if e.is_throttling() => {
                warn!(
                    stream = %self.state.stream_name(),
                    shard_id = ?self.state.current_shard_id(),
                    error = %e,
                    "Iterator request throttled after cycling"
                );
                self.send_event(ReaderEvent::throttled(
                    self.state.stream_name(),
                    self.state.current_shard_id(),
                    e.to_string(),
                ));
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Advance to the next shard and acquire an iterator for it.
    ///
    /// Past the last shard this wraps to the first one when looping is
    /// allowed; otherwise the traversal becomes exhausted and the selected
    /// shard is left untouched.
    pub async fn cycle(&mut self) -> Result<()> {
        if !self.state.is_discovered() {
            return Err(ReaderError::ShardsNotDiscovered);
        }

        let shard_count = self.state.shard_count();
        let next = self.state.current_shard_index().map_or(0, |i| i + 1);

        let (index, wrapped) = if next < shard_count {
            (next, false)
        } else if self.config.allow_looping && shard_count > 0 {
            (0, true)
        } else {
            error!(
                stream = %self.state.stream_name(),
                shard_count,
                "All shards exhausted"
            );
            self.phase = TraversalPhase::Exhausted;
            self.send_event(ReaderEvent::shards_exhausted(
                self.state.stream_name(),
                shard_count,
            ));
            return Err(self.exhausted_error());
        };

        self.state.select_shard(index);
        self.phase = TraversalPhase::Selecting;

        if let Some(shard_id) = self.state.current_shard_id() {
            debug!(
                stream = %self.state.stream_name(),
                shard_id = %shard_id,
                index,
                wrapped,
                "Selected shard"
            );
            self.send_event(ReaderEvent::shard_selected(
                self.state.stream_name(),
                shard_id,
                index,
                wrapped,
            ));
        }

        if !self.config.cycle_pause.is_zero() {
            tokio::time::sleep(self.config.cycle_pause).await;
        }

        self.acquire_cursor().await
    }

    fn exhausted_error(&self) -> ReaderError {
        ReaderError::ShardsExhausted {
            stream: self.state.stream_name().to_string(),
            shard_count: self.state.shard_count(),
        }
    }

    fn send_event(&self, event: ReaderEvent) {
        if let Some(tx) = &self.monitoring_tx {
            if let Err(e) = tx.try_send(event) {
                trace!(error = %e, "Dropped monitoring event");
            }
        }
    }
}
