use super::{ShardTraversal, TraversalPhase};
use crate::{
    client::KinesisClientTrait,
    error::{ReaderError, Result},
    monitoring::ReaderEvent,
};
use tracing::{debug, warn};

impl<C> ShardTraversal<C>
where
    C: KinesisClientTrait,
{
    /// Request a fresh iterator for the selected shard.
    ///
    /// The new iterator replaces whatever was held for that shard. Failures are
    /// returned as-is; retrying is left to the caller.
    pub async fn acquire_cursor(&mut self) -> Result<()> {
        let shard_id = self
            .state
            .current_shard_id()
            .ok_or(ReaderError::NoCurrentShard)?
            .to_string();

        let iterator = self
            .client
            .get_shard_iterator(
                self.state.stream_name(),
                &shard_id,
                &self.config.initial_position,
            )
            .await
            .inspect_err(|e| {
                warn!(
                    shard_id = %shard_id,
                    error = %e,
                    "Failed to get shard iterator"
                );
            })?;

        debug!(
            shard_id = %shard_id,
            position = ?self.config.initial_position,
            "Acquired shard iterator"
        );

        self.state.store_iterator(&shard_id, iterator);
        if self.phase == TraversalPhase::Selecting {
            self.phase = TraversalPhase::Pulling;
        }
        self.send_event(ReaderEvent::iterator_acquired(
            self.state.stream_name(),
            &shard_id,
        ));
        Ok(())
    }
}
