//! Kinesis Shard Reader - a pull-based, round-robin AWS Kinesis reader
//!
//! This crate discovers the shards of a stream and reads them one at a time,
//! cycling to the next shard whenever the current one is throttled. Batches
//! are handed out through a closable, pull-based [`ShardReader`].

pub mod client;
pub mod config;
pub mod error;
pub mod monitoring;
pub mod reader;
pub mod traversal;

// Make test utilities available for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use client::{KinesisClientTrait, RecordBatch, ShardPage};
pub use config::{InitialPosition, ReaderConfig};
pub use error::{ReaderError, Result, TransportError};
pub use reader::{CloseHandle, ShardReader};
pub use traversal::{ShardTraversal, StreamState, TraversalPhase};
