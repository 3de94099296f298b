use serde::Deserialize;
use std::time::SystemTime;

/// Configuration for the monitoring channel
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,
    /// Size of the monitoring channel buffer
    pub channel_size: usize,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_size: 1000,
        }
    }
}

impl MonitoringConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }
}

/// A monitoring event from the shard reader
#[derive(Debug, Clone)]
pub struct ReaderEvent {
    /// When the event occurred
    pub timestamp: SystemTime,
    /// Stream being read
    pub stream_name: String,
    /// Shard this event relates to, if any
    pub shard_id: Option<String>,
    /// The type of event and its details
    pub event_type: ReaderEventType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEventType {
    /// The full shard list is known
    ShardsDiscovered { shard_count: usize, pages: usize },
    /// The reader moved to another shard
    ShardSelected { index: usize, wrapped: bool },
    /// A fresh shard iterator was stored
    IteratorAcquired,
    /// A GetRecords call succeeded
    BatchFetched {
        record_count: usize,
        millis_behind_latest: Option<i64>,
    },
    /// A read was throttled and the reader cycled away from the shard
    Throttled { error: String },
    /// The shard was closed and returned no next iterator
    ShardEnded,
    /// Cycling ran past the last shard with looping disabled
    ShardsExhausted { shard_count: usize },
}

impl ReaderEvent {
    fn new(stream_name: &str, shard_id: Option<&str>, event_type: ReaderEventType) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stream_name: stream_name.to_string(),
            shard_id: shard_id.map(String::from),
            event_type,
        }
    }

    pub fn shards_discovered(stream_name: &str, shard_count: usize, pages: usize) -> Self {
        Self::new(
            stream_name,
            None,
            ReaderEventType::ShardsDiscovered { shard_count, pages },
        )
    }

    pub fn shard_selected(stream_name: &str, shard_id: &str, index: usize, wrapped: bool) -> Self {
        Self::new(
            stream_name,
            Some(shard_id),
            ReaderEventType::ShardSelected { index, wrapped },
        )
    }

    pub fn iterator_acquired(stream_name: &str, shard_id: &str) -> Self {
        Self::new(stream_name, Some(shard_id), ReaderEventType::IteratorAcquired)
    }

    pub fn batch_fetched(
        stream_name: &str,
        shard_id: &str,
        record_count: usize,
        millis_behind_latest: Option<i64>,
    ) -> Self {
        Self::new(
            stream_name,
            Some(shard_id),
            ReaderEventType::BatchFetched {
                record_count,
                millis_behind_latest,
            },
        )
    }

    pub fn throttled(stream_name: &str, shard_id: Option<&str>, error: String) -> Self {
        Self::new(stream_name, shard_id, ReaderEventType::Throttled { error })
    }

    pub fn shard_ended(stream_name: &str, shard_id: &str) -> Self {
        Self::new(stream_name, Some(shard_id), ReaderEventType::ShardEnded)
    }

    pub fn shards_exhausted(stream_name: &str, shard_count: usize) -> Self {
        Self::new(
            stream_name,
            None,
            ReaderEventType::ShardsExhausted { shard_count },
        )
    }
}
