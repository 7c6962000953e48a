//! The transport-agnostic bus contract.

use async_trait::async_trait;
use colearn_events::EventEnvelope;

use crate::error::BusError;
use crate::topic::{Topic, TopicCursor};

/// Events returned by one read, plus the cursor to resume from.
#[derive(Debug, Clone)]
pub struct ReadBatch {
    pub events: Vec<EventEnvelope>,
    pub cursor: TopicCursor,
}

/// Outcome of a validated publish.
///
/// Validation happens above the transport; a rejected envelope never
/// reaches it. Carrying the reason lets callers and tests observe the
/// rejection instead of inferring it from an absent side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    Rejected(String),
}

impl PublishOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PublishOutcome::Delivered)
    }
}

/// A message transport. Both backends satisfy the same semantics.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Delivers `event` to `topic`.
    ///
    /// At-least-once: a caller that gets `Ok` must assume eventual
    /// visibility to readers. No deduplication is performed; publishing
    /// logically identical content twice delivers two envelopes.
    async fn publish(&self, topic: Topic, event: &EventEnvelope) -> Result<(), BusError>;

    /// Returns every event published to `topic` strictly after `cursor`,
    /// in publish order.
    ///
    /// Passing the returned cursor to a subsequent call never re-delivers a
    /// previously returned event and never skips one. An empty batch is a
    /// valid result even when more events are in flight.
    async fn read_new(&self, topic: Topic, cursor: TopicCursor) -> Result<ReadBatch, BusError>;
}
