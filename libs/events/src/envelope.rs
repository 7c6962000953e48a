//! Event envelope - the common wrapper for all protocol events.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EventError;
use crate::types::EventType;

/// Authoring role of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// The coaching side of a learning interaction.
    Coach,
    /// The learning side of a learning interaction.
    Student,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Coach => write!(f, "coach"),
            Actor::Student => write!(f, "student"),
        }
    }
}

/// The event envelope - the canonical serialized unit of the protocol.
///
/// Field names are part of the wire contract and must be preserved exactly:
/// logs written by earlier deployments are replayed through this type.
/// Envelopes are append-only records; there is no update or delete, only
/// newer envelopes that logically supersede prior state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Creation timestamp, stamped once at construction and never mutated.
    pub ts: DateTime<Utc>,

    /// Authoring role.
    pub actor: Actor,

    /// Groups causally related events. Opaque to the bus.
    pub session_id: String,

    /// Semantic type; determines the required payload shape.
    pub event_type: EventType,

    /// Open key/value payload, validated per event type.
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl EventEnvelope {
    /// Builds a new envelope stamped with the current time.
    pub fn new(
        actor: Actor,
        session_id: impl Into<String>,
        event_type: EventType,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            ts: Utc::now(),
            actor,
            session_id: session_id.into(),
            event_type,
            payload,
        }
    }

    /// Decodes the payload into one of the typed payload shapes.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, EventError> {
        Ok(serde_json::from_value(Value::Object(self.payload.clone()))?)
    }
}
