//! Error types for bus transports.

use thiserror::Error;

/// Errors that can occur when publishing to or reading from a transport.
///
/// Malformed stored records are not errors: they are dropped per-record
/// during reads so one bad line never aborts the rest.
#[derive(Debug, Error)]
pub enum BusError {
    /// Filesystem failure on the topic log (other than a missing file,
    /// which is self-healed).
    #[error("topic log i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The envelope could not be serialized for the wire.
    #[error("could not serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The broker rejected an operation or is unreachable.
    #[error("broker error: {0}")]
    Broker(#[from] rdkafka::error::KafkaError),
}
