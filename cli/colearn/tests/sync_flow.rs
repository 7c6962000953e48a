//! Integration tests for the sync router over the file transport.
//!
//! Coach and student contexts share one bus root, the way two processes
//! share a log directory, and coordinate only through published envelopes.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use colearn::router::SyncContext;
use colearn::state;
use colearn_bus::{Bus, FileBus, PublishOutcome, Topic, TopicCursor};
use colearn_events::{Actor, EventType};
use serde_json::json;
use tempfile::{tempdir, TempDir};

struct Harness {
    _dir: TempDir,
    bus: Arc<dyn Bus>,
    coach: SyncContext,
    student: SyncContext,
}

fn harness() -> Harness {
    harness_for("s-1", "student-1", "s-1", "student-1")
}

fn harness_for(
    coach_session: &str,
    coach_student: &str,
    student_session: &str,
    student_student: &str,
) -> Harness {
    let dir = tempdir().unwrap();
    let bus: Arc<dyn Bus> = Arc::new(FileBus::new(dir.path().join("bus")));

    let coach = context(
        &bus,
        Actor::Coach,
        coach_session,
        coach_student,
        dir.path(),
        "coach",
    );
    let student = context(
        &bus,
        Actor::Student,
        student_session,
        student_student,
        dir.path(),
        "student",
    );

    Harness {
        _dir: dir,
        bus,
        coach,
        student,
    }
}

fn context(
    bus: &Arc<dyn Bus>,
    role: Actor,
    session: &str,
    student: &str,
    dir: &Path,
    name: &str,
) -> SyncContext {
    SyncContext::new(
        Arc::clone(bus),
        role,
        session,
        student,
        dir.join(format!("state-{name}.json")),
        dir.to_path_buf(),
    )
}

#[tokio::test]
async fn test_session_filter_scopes_sync() {
    let mut h = harness();

    // Same topic, two sessions. Only s-1 traffic may surface for s-1.
    let for_us = h
        .coach
        .build_event(EventType::ProgressUpdate, json!({ "completed": ["a"] }));
    h.coach.publish(Topic::Progress, &for_us).await.unwrap();

    let other = context(&h.bus, Actor::Coach, "s-2", "student-1", h._dir.path(), "other");
    let not_for_us =
        other.build_event(EventType::ProgressUpdate, json!({ "completed": ["b"] }));
    other.publish(Topic::Progress, &not_for_us).await.unwrap();

    // Both events come back from the underlying read; only s-1 surfaces.
    let lines = h.coach.sync().await.unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("progress_update"));
    assert!(lines[0].contains("\"a\""));

    // Cursors advanced past the filtered event too: nothing on re-sync.
    let again = h.coach.sync().await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_echo_suppression_keeps_own_state_untouched() {
    let mut h = harness();

    let own = h
        .student
        .build_event(EventType::ProgressUpdate, json!({ "completed": ["step-1"] }));
    h.student.publish(Topic::Progress, &own).await.unwrap();

    h.student.sync().await.unwrap();

    // The student never reacts to student-authored traffic.
    let state = state::load(&h._dir.path().join("state-student.json"));
    assert!(state.progress.completed.is_empty());
}

#[tokio::test]
async fn test_invalid_event_rejected_before_transport() {
    let h = harness();

    // assessment_feedback requires a grade.
    let invalid = h
        .coach
        .build_event(EventType::AssessmentFeedback, json!({ "mistakes": [] }));
    let outcome = h.coach.publish(Topic::Feedback, &invalid).await.unwrap();

    let PublishOutcome::Rejected(reason) = outcome else {
        panic!("expected rejection");
    };
    assert!(reason.contains("grade"));

    // Nothing reached any topic reader, mirror included.
    for topic in [Topic::Feedback, Topic::Events] {
        let batch = h.bus.read_new(topic, TopicCursor::START).await.unwrap();
        assert!(batch.events.is_empty(), "unexpected events on {topic}");
    }
}

#[tokio::test]
async fn test_mirror_receives_copy_of_every_publish() {
    let h = harness();

    let event = h.coach.build_event(
        EventType::ExerciseAssigned,
        json!({ "topic": "ownership", "exercise": "write a splitter" }),
    );
    h.coach.publish(Topic::Assignments, &event).await.unwrap();

    let direct = h
        .bus
        .read_new(Topic::Assignments, TopicCursor::START)
        .await
        .unwrap();
    let mirror = h.bus.read_new(Topic::Events, TopicCursor::START).await.unwrap();
    assert_eq!(direct.events, mirror.events);
    assert_eq!(mirror.events.len(), 1);
}

#[tokio::test]
async fn test_learning_plan_replaces_student_plan() {
    let mut h = harness();

    let plan = h.coach.build_event(
        EventType::LearningPlan,
        json!({
            "plan": [
                { "id": "p1", "topic": "ownership", "status": "pending" },
                { "id": "p2", "topic": "lifetimes", "status": "pending" },
            ]
        }),
    );
    h.coach.publish(Topic::Progress, &plan).await.unwrap();

    let lines = h.student.sync().await.unwrap();
    assert_eq!(lines.len(), 1);

    let state = state::load(&h._dir.path().join("state-student.json"));
    assert_eq!(state.plan.len(), 2);
    assert_eq!(state.plan[0].id, "p1");
}

#[tokio::test]
async fn test_progress_update_merges_into_coach_state() {
    let mut h = harness();

    let first = h.student.build_event(
        EventType::ProgressUpdate,
        json!({ "completed": ["p1"], "confidence": { "ownership": 0.5 } }),
    );
    h.student.publish(Topic::Progress, &first).await.unwrap();

    let second = h.student.build_event(
        EventType::ProgressUpdate,
        json!({ "completed": ["p2"], "confidence": { "ownership": 0.7 } }),
    );
    h.student.publish(Topic::Progress, &second).await.unwrap();

    h.coach.sync().await.unwrap();

    let state = state::load(&h._dir.path().join("state-coach.json"));
    assert_eq!(state.progress.completed, vec!["p1", "p2"]);
    assert_eq!(state.progress.confidence["ownership"], 0.7);
}

#[tokio::test]
async fn test_feedback_delta_clamped_on_student_state() {
    let mut h = harness();

    state::apply_progress(
        &h._dir.path().join("state-student.json"),
        &[],
        &BTreeMap::from([("ownership".to_string(), 0.9)]),
    )
    .unwrap();

    let feedback = h.coach.build_event(
        EventType::AssessmentFeedback,
        json!({ "grade": "pass", "confidence_delta": 0.5 }),
    );
    h.coach.publish(Topic::Feedback, &feedback).await.unwrap();

    h.student.sync().await.unwrap();

    let state = state::load(&h._dir.path().join("state-student.json"));
    assert_eq!(state.progress.confidence["ownership"], 1.0);
}

#[tokio::test]
async fn test_evidence_request_in_scope_gets_auto_reply() {
    let mut h = harness();

    let requested = h._dir.path().join("notes.md");
    let request = h.coach.build_event(
        EventType::EvidenceRequest,
        json!({ "path": requested.to_string_lossy(), "reason": "show workings" }),
    );
    h.coach.publish(Topic::Assignments, &request).await.unwrap();

    h.student.sync().await.unwrap();

    let batch = h.bus.read_new(Topic::Progress, TopicCursor::START).await.unwrap();
    assert_eq!(batch.events.len(), 1);
    let snapshot = &batch.events[0];
    assert_eq!(snapshot.event_type, EventType::EvidenceSnapshot);
    assert_eq!(snapshot.actor, Actor::Student);
    assert_eq!(snapshot.payload["note"], json!("show workings"));
}

#[tokio::test]
async fn test_evidence_request_outside_scope_is_ignored() {
    let mut h = harness();

    let request = h.coach.build_event(
        EventType::EvidenceRequest,
        json!({ "path": "/etc/passwd", "reason": "curious" }),
    );
    h.coach.publish(Topic::Assignments, &request).await.unwrap();

    h.student.sync().await.unwrap();

    let batch = h.bus.read_new(Topic::Progress, TopicCursor::START).await.unwrap();
    assert!(batch.events.is_empty());
}

#[tokio::test]
async fn test_events_for_other_student_not_applied() {
    let mut h = harness_for("s-1", "student-9", "s-1", "student-1");

    let plan = h.coach.build_event(
        EventType::LearningPlan,
        json!({ "plan": [{ "id": "p1", "topic": "traits", "status": "pending" }] }),
    );
    h.coach.publish(Topic::Progress, &plan).await.unwrap();

    // The event surfaces (same session) but is addressed to student-9.
    let lines = h.student.sync().await.unwrap();
    assert_eq!(lines.len(), 1);

    let state = state::load(&h._dir.path().join("state-student.json"));
    assert!(state.plan.is_empty());
}
