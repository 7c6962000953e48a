//! colearn - coach/student learning sync over a pluggable message bus.
//!
//! Two roles (coach, student) run as separate processes and coordinate
//! exclusively through a shared transport: either a local append-only log
//! or a Kafka broker, selected by `COLEARN_BUS`. Each invocation is
//! one-shot; cursors live in memory, so `sync` always replays the full
//! topic history and applies what is addressed to the active session.

pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod router;
pub mod scope;
pub mod state;
