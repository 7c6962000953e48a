//! # colearn-events
//!
//! Event envelope schema and validation for the colearn protocol.
//!
//! ## Design Principles
//!
//! - Envelopes are immutable once constructed; state is only ever superseded
//!   by newer envelopes, never edited in place
//! - Every envelope belongs to exactly one session
//! - The wire shape (`ts`, `actor`, `session_id`, `event_type`, `payload`)
//!   is a compatibility contract with previously stored logs
//! - Unknown event types still parse and pass payload validation; the
//!   permissive path is an explicit branch, not fallthrough
//!
//! ## Validation
//!
//! [`validate`] is the single gate an envelope passes before any publish and
//! before a consumer acts on it. It checks envelope completeness
//! ([`validate_envelope`]) and the per-type payload shape
//! ([`validate_payload`]).

mod envelope;
mod error;
mod types;

pub use envelope::*;
pub use error::EventError;
pub use types::*;
