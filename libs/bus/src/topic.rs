//! Topics and cursors.

use serde::{Deserialize, Serialize};

/// The four fixed channels of the protocol.
///
/// Wire names are part of the contract and must be preserved exactly. The
/// three directional topics carry the traffic; `events` is a universal
/// mirror that receives a copy of everything published to the other three,
/// so full history can be reconstructed from a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Progress,
    Assignments,
    Feedback,
    Events,
}

impl Topic {
    /// The three directional topics, excluding the mirror.
    pub const DIRECTIONAL: [Topic; 3] = [Topic::Progress, Topic::Assignments, Topic::Feedback];

    /// The wire name of this topic: broker topic name, or log file stem.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Topic::Progress => "progress",
            Topic::Assignments => "assignments",
            Topic::Feedback => "feedback",
            Topic::Events => "events",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Position of one consumer within one topic.
///
/// Opaque and monotonically non-decreasing. Held only in process memory by
/// the consuming context; the bus never persists it, so a fresh process
/// restarts consumption from [`TopicCursor::START`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TopicCursor {
    pub offset: usize,
}

impl TopicCursor {
    /// The beginning of a topic; reading from here replays full history.
    pub const START: TopicCursor = TopicCursor { offset: 0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(Topic::Progress.wire_name(), "progress");
        assert_eq!(Topic::Assignments.wire_name(), "assignments");
        assert_eq!(Topic::Feedback.wire_name(), "feedback");
        assert_eq!(Topic::Events.wire_name(), "events");
    }

    #[test]
    fn test_directional_excludes_mirror() {
        assert!(!Topic::DIRECTIONAL.contains(&Topic::Events));
        assert_eq!(Topic::DIRECTIONAL.len(), 3);
    }

    #[test]
    fn test_cursor_ordering() {
        assert!(TopicCursor::START < TopicCursor { offset: 1 });
        assert_eq!(TopicCursor::default(), TopicCursor::START);
    }
}
