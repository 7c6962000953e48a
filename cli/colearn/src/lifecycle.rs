//! Lifecycle journal: a local JSONL record of session stages.
//!
//! The journal is process-local history (`history` command); the matching
//! `lifecycle` bus event is what the other side sees.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Stage of a learning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Plan,
    Practice,
    Review,
    Done,
    // Journal-only stages, not selectable from the CLI.
    #[value(skip)]
    Note,
    #[value(skip)]
    Insight,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Plan => "plan",
            Stage::Practice => "practice",
            Stage::Review => "review",
            Stage::Done => "done",
            Stage::Note => "note",
            Stage::Insight => "insight",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub ts: DateTime<Utc>,
    pub session_id: String,
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LifecycleEvent {
    pub fn now(session_id: impl Into<String>, stage: Stage) -> Self {
        Self {
            ts: Utc::now(),
            session_id: session_id.into(),
            stage,
            note: None,
        }
    }
}

/// Appends one journal line, creating the parent directory on demand.
pub fn append(path: &Path, event: &LifecycleEvent) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?
        .write_all(line.as_bytes())?;
    Ok(())
}

/// Reads the whole journal; malformed lines are dropped per-record.
pub fn read(path: &Path) -> Vec<LifecycleEvent> {
    let Ok(data) = fs::read_to_string(path) else {
        return Vec::new();
    };
    data.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(error = %err, "dropping malformed journal line");
                None
            }
        })
        .collect()
}

/// Journal entries belonging to one session, in append order.
pub fn read_session(path: &Path, session_id: &str) -> Vec<LifecycleEvent> {
    read(path)
        .into_iter()
        .filter(|event| event.session_id == session_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_and_read_by_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lifecycle.jsonl");

        append(&path, &LifecycleEvent::now("s-1", Stage::Init)).unwrap();
        append(&path, &LifecycleEvent::now("s-2", Stage::Plan)).unwrap();
        append(&path, &LifecycleEvent::now("s-1", Stage::Done)).unwrap();

        let events = read_session(&path, "s-1");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].stage, Stage::Init);
        assert_eq!(events[1].stage, Stage::Done);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lifecycle.jsonl");

        append(&path, &LifecycleEvent::now("s-1", Stage::Init)).unwrap();
        let mut data = fs::read_to_string(&path).unwrap();
        data.push_str("garbage\n");
        fs::write(&path, data).unwrap();
        append(&path, &LifecycleEvent::now("s-1", Stage::Review)).unwrap();

        assert_eq!(read(&path).len(), 2);
    }

    #[test]
    fn test_stage_wire_names() {
        assert_eq!(serde_json::to_string(&Stage::Practice).unwrap(), "\"practice\"");
        let parsed: Stage = serde_json::from_str("\"insight\"").unwrap();
        assert_eq!(parsed, Stage::Insight);
    }
}
