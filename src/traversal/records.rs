use super::{ShardTraversal, TraversalPhase};
use crate::{
    client::{KinesisClientTrait, RecordBatch},
    error::{ReaderError, Result},
    monitoring::ReaderEvent,
};
use aws_sdk_kinesis::types::Record;
use tracing::{debug, info, warn};

impl<C> ShardTraversal<C>
where
    C: KinesisClientTrait,
{
    /// Fetch one batch from the selected shard.
    ///
    /// Iterators are single use, so the next iterator returned by the service
    /// replaces the held one even when the batch is empty. A missing next
    /// iterator means the shard was closed; the traversal then moves on to the
    /// next shard before its following pull.
    pub async fn pull_records(&mut self) -> Result<Vec<Record>> {
        let shard_id = self
            .state
            .current_shard_id()
            .ok_or(ReaderError::NoCurrentShard)?
            .to_string();
        let iterator = self
            .state
            .shard_iterator(&shard_id)
            .ok_or_else(|| ReaderError::MissingIterator(shard_id.clone()))?;

        let RecordBatch {
            records,
            next_shard_iterator,
            millis_behind_latest,
        } = self
            .client
            .get_records(iterator, self.config.batch_size)
            .await
            .inspect_err(|e| {
                warn!(
                    shard_id = %shard_id,
                    error = %e,
                    "Failed to get records"
                );
            })?;

        debug!(
            shard_id = %shard_id,
            record_count = records.len(),
            millis_behind_latest = ?millis_behind_latest,
            "Fetched record batch"
        );
        self.send_event(ReaderEvent::batch_fetched(
            self.state.stream_name(),
            &shard_id,
            records.len(),
            millis_behind_latest,
        ));

        match next_shard_iterator {
            Some(next) => self.state.store_iterator(&shard_id, next),
            None => {
                info!(shard_id = %shard_id, "Shard closed, moving on after this batch");
                self.state.drop_iterator(&shard_id);
                self.phase = TraversalPhase::ShardEnded;
                self.send_event(ReaderEvent::shard_ended(self.state.stream_name(), &shard_id));
            }
        }

        if !self.config.read_pause.is_zero() {
            tokio::time::sleep(self.config.read_pause).await;
        }

        Ok(records)
    }
}
