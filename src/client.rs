//! Transport seam between the traversal engine and the Kinesis service

use crate::config::InitialPosition;
use crate::error::TransportError;
use async_trait::async_trait;
use aws_sdk_kinesis::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kinesis::types::Record;
use aws_sdk_kinesis::Client;
use aws_smithy_types_convert::date_time::DateTimeExt;
use tracing::trace;

/// One page of a stream description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardPage {
    pub shard_ids: Vec<String>,
    pub has_more_shards: bool,
}

/// Result of a single GetRecords call
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    /// `None` once the shard has been closed and fully read
    pub next_shard_iterator: Option<String>,
    pub millis_behind_latest: Option<i64>,
}

#[async_trait]
pub trait KinesisClientTrait: Send + Sync {
    async fn describe_stream(
        &self,
        stream_name: &str,
        exclusive_start_shard_id: Option<&str>,
    ) -> Result<ShardPage, TransportError>;

    async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard_id: &str,
        position: &InitialPosition,
    ) -> Result<String, TransportError>;

    async fn get_records(
        &self,
        shard_iterator: &str,
        limit: Option<i32>,
    ) -> Result<RecordBatch, TransportError>;
}

fn translate_sdk_error<E, R>(err: SdkError<E, R>) -> TransportError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::TimeoutError(_) => TransportError::Timeout(DisplayErrorContext(&err).to_string()),
        SdkError::DispatchFailure(_) => {
            TransportError::Connection(DisplayErrorContext(&err).to_string())
        }
        _ => {
            let message = err
                .message()
                .map(String::from)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
            TransportError::from_code(err.code(), message)
        }
    }
}

#[async_trait]
impl KinesisClientTrait for Client {
    async fn describe_stream(
        &self,
        stream_name: &str,
        exclusive_start_shard_id: Option<&str>,
    ) -> Result<ShardPage, TransportError> {
        let response = self
            .describe_stream()
            .stream_name(stream_name)
            .set_exclusive_start_shard_id(exclusive_start_shard_id.map(String::from))
            .send()
            .await
            .map_err(translate_sdk_error)?;

        let description =
            response
                .stream_description()
                .ok_or_else(|| TransportError::Service {
                    code: "MissingStreamDescription".to_string(),
                    message: format!("DescribeStream returned no description for {}", stream_name),
                })?;

        Ok(ShardPage {
            shard_ids: description
                .shards()
                .iter()
                .map(|shard| shard.shard_id().to_string())
                .collect(),
            has_more_shards: description.has_more_shards(),
        })
    }

    async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard_id: &str,
        position: &InitialPosition,
    ) -> Result<String, TransportError> {
        let mut req = self
            .get_shard_iterator()
            .stream_name(stream_name)
            .shard_id(shard_id)
            .shard_iterator_type(position.iterator_type())
            .set_starting_sequence_number(position.sequence_number().map(String::from));

        if let Some(ts) = position.resolve_timestamp() {
            trace!(shard_id = %shard_id, timestamp = %ts, "Requesting iterator at timestamp");
            req = req.timestamp(aws_smithy_types::DateTime::from_chrono_utc(ts));
        }

        let response = req.send().await.map_err(translate_sdk_error)?;
        response
            .shard_iterator
            .ok_or_else(|| TransportError::Service {
                code: "MissingShardIterator".to_string(),
                message: format!("GetShardIterator returned no iterator for {}", shard_id),
            })
    }

    async fn get_records(
        &self,
        shard_iterator: &str,
        limit: Option<i32>,
    ) -> Result<RecordBatch, TransportError> {
        let response = self
            .get_records()
            .shard_iterator(shard_iterator)
            .set_limit(limit)
            .send()
            .await
            .map_err(translate_sdk_error)?;

        Ok(RecordBatch {
            records: response.records().to_vec(),
            next_shard_iterator: response.next_shard_iterator().map(String::from),
            millis_behind_latest: response.millis_behind_latest(),
        })
    }
}
