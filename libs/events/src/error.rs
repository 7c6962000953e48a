//! Error types for event handling.

use thiserror::Error;

/// Errors that can occur when validating or decoding events.
#[derive(Debug, Error, Clone)]
pub enum EventError {
    /// A required envelope field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The payload does not have the shape required by the event type.
    #[error("invalid payload for {event_type}: {reason}")]
    InvalidPayload { event_type: String, reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}
