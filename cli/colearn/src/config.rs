//! Runtime configuration resolved from the environment.
//!
//! Everything is env-driven; there is no config file. `COLEARN_HOME` moves
//! the data directory (state, lifecycle journal, local log root) away from
//! the working directory, and `COLEARN_BUS=kafka` switches transports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use colearn_bus::{Bus, FileBus, KafkaBus, KafkaConfig};
use rand::Rng;

/// Which transport backs the bus for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    Kafka,
}

impl Backend {
    /// Resolves the single backend toggle: `COLEARN_BUS=kafka` selects the
    /// broker, anything else the local log.
    pub fn from_env() -> Self {
        match std::env::var("COLEARN_BUS") {
            Ok(value) if value == "kafka" => Backend::Kafka,
            _ => Backend::File,
        }
    }
}

/// On-disk locations for one invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    pub state: PathBuf,
    pub lifecycle: PathBuf,
    pub bus_root: PathBuf,
}

impl Paths {
    pub fn from_env() -> Self {
        let data = data_dir();
        Self {
            state: data.join("state.json"),
            lifecycle: data.join("lifecycle.jsonl"),
            bus_root: data.join("bus"),
        }
    }
}

/// `$COLEARN_HOME/.colearn`, or `./.colearn`.
pub fn data_dir() -> PathBuf {
    let home = std::env::var("COLEARN_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    home.join(".colearn")
}

pub fn log_level() -> String {
    std::env::var("COLEARN_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string())
}

/// Constructs the selected transport.
pub fn make_bus(backend: Backend, bus_root: &Path) -> Arc<dyn Bus> {
    match backend {
        Backend::Kafka => Arc::new(KafkaBus::new(KafkaConfig::from_env())),
        Backend::File => Arc::new(FileBus::new(bus_root)),
    }
}

/// Session id used when none is supplied.
pub fn default_session_id() -> String {
    format!("session-{}", Utc::now().timestamp_millis())
}

/// Student id used when none is supplied.
pub fn default_student_id() -> String {
    let n: u32 = rand::rng().random_range(0..10_000);
    format!("student-{n}")
}
