//! # colearn-bus
//!
//! Pluggable message bus for the colearn protocol.
//!
//! Two transports implement the same [`Bus`] contract with byte-identical
//! delivery semantics:
//!
//! - [`FileBus`]: one append-only JSONL file per topic under a local root
//!   directory. Synchronous appends, single-writer assumed.
//! - [`KafkaBus`]: a Kafka-backed transport with a lazily connected producer
//!   and per-topic consumer subscriptions adapted from push delivery to
//!   pull-style cursor reads.
//!
//! ## Delivery Semantics
//!
//! - At-least-once: the bus never deduplicates; publishing logically
//!   identical content twice delivers two envelopes
//! - `read_new` returns everything published strictly after the caller's
//!   cursor, in publish order, and never re-delivers or skips given the
//!   cursors it hands back
//! - Cursors live in process memory only; a fresh process restarts from
//!   zero and deterministically replays the full topic history

mod bus;
mod config;
mod error;
mod file;
mod kafka;
mod topic;

pub use bus::{Bus, PublishOutcome, ReadBatch};
pub use config::KafkaConfig;
pub use error::BusError;
pub use file::FileBus;
pub use kafka::KafkaBus;
pub use topic::{Topic, TopicCursor};
