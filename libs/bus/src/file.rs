//! File-backed transport: one append-only JSONL file per topic.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use colearn_events::EventEnvelope;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::bus::{Bus, ReadBatch};
use crate::error::BusError;
use crate::topic::{Topic, TopicCursor};

/// Default log root, relative to the working directory.
pub const DEFAULT_ROOT: &str = ".colearn/bus";

/// Local append-only log bus.
///
/// No inter-process locking is applied: two processes appending to the same
/// file concurrently can interleave lines. The design assumes one writer
/// per file.
pub struct FileBus {
    root: PathBuf,
}

impl FileBus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn topic_path(&self, topic: Topic) -> PathBuf {
        self.root.join(format!("{}.jsonl", topic.wire_name()))
    }
}

impl Default for FileBus {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

#[async_trait]
impl Bus for FileBus {
    async fn publish(&self, topic: Topic, event: &EventEnvelope) -> Result<(), BusError> {
        let path = self.topic_path(topic);
        fs::create_dir_all(&self.root).await?;

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn read_new(&self, topic: Topic, cursor: TopicCursor) -> Result<ReadBatch, BusError> {
        let path = self.topic_path(topic);
        let data = match fs::read_to_string(&path).await {
            Ok(data) => data,
            // A topic nobody has published to yet is empty, not an error.
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(ReadBatch {
                    events: Vec::new(),
                    cursor,
                })
            }
            Err(err) => return Err(err.into()),
        };

        // The cursor is a line index; counting malformed lines keeps offsets
        // stable across readers that saw the file at different times.
        let lines: Vec<&str> = data.lines().filter(|line| !line.trim().is_empty()).collect();
        let start = cursor.offset.min(lines.len());

        let mut events = Vec::with_capacity(lines.len() - start);
        for line in &lines[start..] {
            match serde_json::from_str::<EventEnvelope>(line) {
                Ok(event) => events.push(event),
                Err(err) => {
                    warn!(topic = %topic, error = %err, "dropping malformed record");
                }
            }
        }

        Ok(ReadBatch {
            events,
            cursor: TopicCursor {
                offset: lines.len(),
            },
        })
    }
}
