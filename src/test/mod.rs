//! Test utilities and mock implementations for testing the shard reader


use crate::config::ReaderConfig;
use aws_sdk_kinesis::types::Record;
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Helper functions for creating test data
pub struct TestUtils;

impl TestUtils {
    /// Initialize logging for tests, once per process
    pub fn init_logging() {
        INIT_LOGGING.call_once(|| {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env()
                        .add_directive("kinesis_shard_reader=debug".parse().unwrap()),
                )
                .with_test_writer()
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .try_init()
                .ok();
        });
    }

    /// Create a test record with given sequence number and data
    pub fn create_test_record(sequence_number: &str, data: &[u8]) -> Record {
        Record::builder()
            .sequence_number(sequence_number)
            .data(aws_smithy_types::Blob::new(data.to_vec()))
            .partition_key("test-partition-key")
            .build()
            .expect("Failed to build test record")
    }

    /// Create a vector of test records
    pub fn create_test_records(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                Self::create_test_record(
                    &format!("sequence-{}", i),
                    format!("data-{}", i).as_bytes(),
                )
            })
            .collect()
    }

    /// `shard-0` .. `shard-{count-1}`
    pub fn shard_ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("shard-{}", i)).collect()
    }

    /// Reader configuration without pacing delays
    pub fn test_config(stream_name: &str) -> ReaderConfig {
        ReaderConfig::new(stream_name)
            .with_read_pause(Duration::ZERO)
            .with_cycle_pause(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_records() {
        let records = TestUtils::create_test_records(3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sequence_number(), "sequence-0");
        assert_eq!(records[2].data().as_ref(), b"data-2");
        assert_eq!(records[0].partition_key(), "test-partition-key");
    }

    #[test]
    fn test_config_has_no_pauses() {
        let config = TestUtils::test_config("test-stream");
        assert_eq!(config.stream_name, "test-stream");
        assert!(config.read_pause.is_zero());
        assert!(config.cycle_pause.is_zero());
    }
}
