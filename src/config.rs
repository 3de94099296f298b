//! Reader configuration
//!
//! Options are resolved once when a reader is constructed and never change
//! afterwards. How they are sourced is up to the caller; `ReaderConfig`
//! derives `Deserialize` so it can be read from any serde format.

use crate::error::{ReaderError, Result};
use crate::monitoring::MonitoringConfig;
use aws_sdk_kinesis::types::ShardIteratorType;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Largest `Limit` accepted by GetRecords
pub const MAX_BATCH_SIZE: i32 = 10_000;

/// Specifies where to start reading from when a shard iterator is acquired
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitialPosition {
    /// Start just after the most recent record
    #[default]
    Latest,
    /// Start from the oldest available record
    TrimHorizon,
    /// Start from a timestamp; `None` means "now" at acquisition time
    AtTimestamp(Option<DateTime<Utc>>),
    /// Start at a specific sequence number
    AtSequenceNumber(String),
    /// Start right after a specific sequence number
    AfterSequenceNumber(String),
}

impl InitialPosition {
    pub fn iterator_type(&self) -> ShardIteratorType {
        match self {
            InitialPosition::Latest => ShardIteratorType::Latest,
            InitialPosition::TrimHorizon => ShardIteratorType::TrimHorizon,
            InitialPosition::AtTimestamp(_) => ShardIteratorType::AtTimestamp,
            InitialPosition::AtSequenceNumber(_) => ShardIteratorType::AtSequenceNumber,
            InitialPosition::AfterSequenceNumber(_) => ShardIteratorType::AfterSequenceNumber,
        }
    }

    pub fn sequence_number(&self) -> Option<&str> {
        match self {
            InitialPosition::AtSequenceNumber(seq) | InitialPosition::AfterSequenceNumber(seq) => {
                Some(seq)
            }
            _ => None,
        }
    }

    /// Timestamp to send with the iterator request.
    ///
    /// Timestamp-based positions without an explicit value resolve to the
    /// current time on every call.
    pub fn resolve_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            InitialPosition::AtTimestamp(ts) => Some(ts.unwrap_or_else(Utc::now)),
            _ => None,
        }
    }
}

/// Configuration for a shard reader
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Name of the Kinesis stream to read
    pub stream_name: String,
    /// Delay after each successful GetRecords call
    #[serde(rename = "read_pause_ms", with = "millis")]
    pub read_pause: Duration,
    /// Delay after advancing to another shard, before its iterator is requested
    #[serde(rename = "cycle_pause_ms", with = "millis")]
    pub cycle_pause: Duration,
    /// Wrap around to the first shard instead of failing after the last one
    pub allow_looping: bool,
    /// Where new shard iterators start
    pub initial_position: InitialPosition,
    /// Maximum records per GetRecords call (None for the service default)
    pub batch_size: Option<i32>,
    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            stream_name: String::new(),
            read_pause: Duration::from_millis(1000),
            cycle_pause: Duration::from_millis(1000),
            allow_looping: false,
            initial_position: InitialPosition::Latest,
            batch_size: None,
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl ReaderConfig {
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            ..Default::default()
        }
    }

    pub fn with_read_pause(mut self, pause: Duration) -> Self {
        self.read_pause = pause;
        self
    }

    pub fn with_cycle_pause(mut self, pause: Duration) -> Self {
        self.cycle_pause = pause;
        self
    }

    pub fn with_looping(mut self, allow_looping: bool) -> Self {
        self.allow_looping = allow_looping;
        self
    }

    pub fn with_initial_position(mut self, position: InitialPosition) -> Self {
        self.initial_position = position;
        self
    }

    pub fn with_batch_size(mut self, batch_size: i32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_monitoring(mut self, monitoring: MonitoringConfig) -> Self {
        self.monitoring = monitoring;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.stream_name.trim().is_empty() {
            return Err(ReaderError::ConfigError(
                "stream_name must not be empty".to_string(),
            ));
        }

        if let Some(size) = self.batch_size {
            if !(1..=MAX_BATCH_SIZE).contains(&size) {
                return Err(ReaderError::ConfigError(format!(
                    "batch_size must be between 1 and {}, got {}",
                    MAX_BATCH_SIZE, size
                )));
            }
        }

        if let Some(seq) = self.initial_position.sequence_number() {
            if seq.is_empty() {
                return Err(ReaderError::ConfigError(
                    "sequence-number positions require a sequence number".to_string(),
                ));
            }
        }

        if self.monitoring.enabled && self.monitoring.channel_size == 0 {
            return Err(ReaderError::ConfigError(
                "monitoring channel_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
