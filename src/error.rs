//! Error types for the shard reader

use thiserror::Error;

/// Failure reported by the Kinesis transport.
///
/// Service error codes are translated into variants by the client adapter, so
/// the traversal engine never has to match on raw code strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Provisioned throughput exceeded: {0}")]
    ThroughputExceeded(String),

    #[error("Shard iterator expired: {0}")]
    ExpiredIterator(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Request limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("KMS error: {0}")]
    Kms(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Kinesis service error ({code}): {message}")]
    Service { code: String, message: String },
}

impl TransportError {
    /// Map a Kinesis service error code onto a transport error.
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some("ProvisionedThroughputExceededException") => {
                TransportError::ThroughputExceeded(message)
            }
            Some("ExpiredIteratorException") => TransportError::ExpiredIterator(message),
            Some("ResourceNotFoundException") => TransportError::ResourceNotFound(message),
            Some("InvalidArgumentException") => TransportError::InvalidArgument(message),
            Some("AccessDeniedException") => TransportError::AccessDenied(message),
            Some("LimitExceededException") => TransportError::LimitExceeded(message),
            Some(code) if code.starts_with("KMS") => TransportError::Kms(message),
            Some(code) => TransportError::Service {
                code: code.to_string(),
                message,
            },
            None => TransportError::Service {
                code: "Unknown".to_string(),
                message,
            },
        }
    }

    /// Whether the service is rate-limiting reads from the current shard
    pub fn is_throttling(&self) -> bool {
        matches!(self, TransportError::ThroughputExceeded(_))
    }
}

/// Main error type for reader operations
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Kinesis transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("All {shard_count} shards of stream {stream} exhausted")]
    ShardsExhausted { stream: String, shard_count: usize },

    #[error("No shard is currently selected")]
    NoCurrentShard,

    #[error("No shard iterator held for shard {0}")]
    MissingIterator(String),

    #[error("Shards have not been discovered yet")]
    ShardsNotDiscovered,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ReaderError {
    pub fn is_throttling(&self) -> bool {
        matches!(self, ReaderError::Transport(e) if e.is_throttling())
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, ReaderError::ShardsExhausted { .. })
    }
}

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, ReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_translation() {
        let err = TransportError::from_code(
            Some("ProvisionedThroughputExceededException"),
            "slow down",
        );
        assert!(err.is_throttling());
        assert_eq!(err, TransportError::ThroughputExceeded("slow down".to_string()));

        assert!(matches!(
            TransportError::from_code(Some("ExpiredIteratorException"), ""),
            TransportError::ExpiredIterator(_)
        ));
        assert!(matches!(
            TransportError::from_code(Some("KMSThrottlingException"), ""),
            TransportError::Kms(_)
        ));
        assert!(matches!(
            TransportError::from_code(Some("LimitExceededException"), ""),
            TransportError::LimitExceeded(_)
        ));
        assert!(matches!(
            TransportError::from_code(None, "boom"),
            TransportError::Service { ref code, .. } if code == "Unknown"
        ));
    }

    #[test]
    fn test_only_throughput_errors_are_throttling() {
        assert!(!TransportError::LimitExceeded("x".to_string()).is_throttling());
        assert!(!TransportError::Timeout("x".to_string()).is_throttling());

        let err: ReaderError = TransportError::ThroughputExceeded("x".to_string()).into();
        assert!(err.is_throttling());
        assert!(!err.is_exhausted());

        let err = ReaderError::ShardsExhausted {
            stream: "s".to_string(),
            shard_count: 2,
        };
        assert!(err.is_exhausted());
        assert!(!err.is_throttling());
    }

    #[test]
    fn test_error_messages() {
        let err = ReaderError::ShardsExhausted {
            stream: "orders".to_string(),
            shard_count: 3,
        };
        assert!(err.to_string().contains("orders"));
        assert!(err.to_string().contains('3'));

        let err: ReaderError = TransportError::AccessDenied("no".to_string()).into();
        assert!(err.to_string().starts_with("Kinesis transport error"));
    }
}
