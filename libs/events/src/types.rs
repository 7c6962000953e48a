//! Event type definitions, typed payload shapes, and validation.
//!
//! The event type set is closed for this build but the wire is not: types
//! this build does not know deserialize into [`EventType::Other`] and pass
//! payload validation unconditionally.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::EventEnvelope;
use crate::error::EventError;

// =============================================================================
// Event Types
// =============================================================================

/// Semantic type of an envelope.
///
/// The string forms are the wire contract; variants serialize to their
/// snake_case names. Anything else round-trips through [`EventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    LearningPlan,
    ExerciseAssigned,
    ExerciseAssignedAck,
    ExerciseSubmission,
    ExerciseSubmissionAck,
    AssessmentFeedback,
    AssessmentFeedbackAck,
    ProgressUpdate,
    SessionStarted,
    SessionClosed,
    SessionHistory,
    StuckReported,
    CoachHint,
    HintAck,
    EvidenceSnapshot,
    EvidenceRequest,
    ScopePolicy,
    Lifecycle,
    /// Forward-compatibility catch-all for event types minted by newer
    /// deployments.
    #[serde(untagged)]
    Other(String),
}

impl EventType {
    /// The wire name of this event type.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::LearningPlan => "learning_plan",
            EventType::ExerciseAssigned => "exercise_assigned",
            EventType::ExerciseAssignedAck => "exercise_assigned_ack",
            EventType::ExerciseSubmission => "exercise_submission",
            EventType::ExerciseSubmissionAck => "exercise_submission_ack",
            EventType::AssessmentFeedback => "assessment_feedback",
            EventType::AssessmentFeedbackAck => "assessment_feedback_ack",
            EventType::ProgressUpdate => "progress_update",
            EventType::SessionStarted => "session_started",
            EventType::SessionClosed => "session_closed",
            EventType::SessionHistory => "session_history",
            EventType::StuckReported => "stuck_reported",
            EventType::CoachHint => "coach_hint",
            EventType::HintAck => "hint_ack",
            EventType::EvidenceSnapshot => "evidence_snapshot",
            EventType::EvidenceRequest => "evidence_request",
            EventType::ScopePolicy => "scope_policy",
            EventType::Lifecycle => "lifecycle",
            EventType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Typed Payloads
// =============================================================================

/// One step of a learning plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub status: String,
}

/// Payload of a `learning_plan` event.
#[derive(Debug, Clone, Deserialize)]
pub struct LearningPlanPayload {
    pub plan: Vec<PlanStep>,
}

/// Payload of a `progress_update` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdatePayload {
    #[serde(default)]
    pub completed: Vec<String>,
    #[serde(default)]
    pub confidence: std::collections::BTreeMap<String, f64>,
}

/// Payload of an `assessment_feedback` event.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentFeedbackPayload {
    pub grade: String,
    #[serde(default)]
    pub mistakes: Vec<String>,
    #[serde(default)]
    pub next_step: String,
    #[serde(default)]
    pub confidence_delta: f64,
}

/// Payload of an `evidence_request` event.
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceRequestPayload {
    pub path: String,
    #[serde(default)]
    pub reason: String,
}

/// Payload of an `evidence_snapshot` event.
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceSnapshotPayload {
    pub path: String,
    #[serde(default)]
    pub note: String,
}

// =============================================================================
// Validation
// =============================================================================

/// Checks envelope completeness: session and event type present and
/// non-empty. Timestamp and actor are enforced by the type system.
pub fn validate_envelope(event: &EventEnvelope) -> Result<(), EventError> {
    if event.session_id.is_empty() {
        return Err(EventError::MissingField("session_id"));
    }
    if matches!(&event.event_type, EventType::Other(name) if name.is_empty()) {
        return Err(EventError::MissingField("event_type"));
    }
    Ok(())
}

/// Checks the payload carries the fields its event type requires.
///
/// Unknown event types pass unconditionally; that keeps old readers working
/// against logs written by newer deployments.
pub fn validate_payload(event: &EventEnvelope) -> Result<(), EventError> {
    let p = &event.payload;
    let (ok, required) = match &event.event_type {
        EventType::LearningPlan => (has_array(p, "plan"), "plan"),
        EventType::ExerciseAssigned => (
            has_str(p, "topic") && has_str(p, "exercise"),
            "topic, exercise",
        ),
        EventType::ExerciseAssignedAck
        | EventType::ExerciseSubmissionAck
        | EventType::AssessmentFeedbackAck => (has_str(p, "status"), "status"),
        EventType::ExerciseSubmission => (has_str(p, "exercise_id"), "exercise_id"),
        EventType::AssessmentFeedback => (has_str(p, "grade"), "grade"),
        EventType::ProgressUpdate => (
            has_array(p, "completed") || has_object(p, "confidence"),
            "completed or confidence",
        ),
        EventType::SessionStarted => (
            has_str(p, "session_id") || has_str(p, "student_id"),
            "session_id or student_id",
        ),
        EventType::SessionClosed => (
            has_str(p, "session_id") || has_object(p, "summary"),
            "session_id or summary",
        ),
        EventType::SessionHistory => (
            has_str(p, "session_id") || has_array(p, "events"),
            "session_id or events",
        ),
        EventType::StuckReported => (
            has_str(p, "session_id") && has_str(p, "summary"),
            "session_id, summary",
        ),
        EventType::CoachHint => (
            has_str(p, "session_id") && has_str(p, "hint"),
            "session_id, hint",
        ),
        EventType::HintAck => (
            has_str(p, "session_id") && has_str(p, "note"),
            "session_id, note",
        ),
        EventType::EvidenceSnapshot | EventType::EvidenceRequest => (has_str(p, "path"), "path"),
        EventType::ScopePolicy => (has_str(p, "scope"), "scope"),
        EventType::Lifecycle => (has_str(p, "stage"), "stage"),
        // Permissive by contract: no required shape for unknown types.
        EventType::Other(_) => (true, ""),
    };
    if ok {
        Ok(())
    } else {
        Err(EventError::InvalidPayload {
            event_type: event.event_type.as_str().to_string(),
            reason: format!("requires {required}"),
        })
    }
}

/// The full validation gate applied before any publish and before a consumer
/// acts on a delivered event.
pub fn validate(event: &EventEnvelope) -> Result<(), EventError> {
    validate_envelope(event)?;
    validate_payload(event)
}

fn has_str(payload: &Map<String, Value>, key: &str) -> bool {
    payload.get(key).is_some_and(Value::is_string)
}

fn has_array(payload: &Map<String, Value>, key: &str) -> bool {
    payload.get(key).is_some_and(Value::is_array)
}

fn has_object(payload: &Map<String, Value>, key: &str) -> bool {
    payload.get(key).is_some_and(Value::is_object)
}
