//! Role-aware, session-scoped consumption loop.
//!
//! `sync` drains the directional topics in role order, advances the stored
//! cursors, filters what the active session is allowed to see, and applies
//! accepted events to the local learning state. The only automatic reply in
//! the protocol lives here: a student answering an in-scope
//! `evidence_request` with an `evidence_snapshot`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colearn_bus::{Bus, PublishOutcome, Topic, TopicCursor};
use colearn_events::{
    validate, Actor, AssessmentFeedbackPayload, EventEnvelope, EventType, EvidenceRequestPayload,
    LearningPlanPayload, ProgressUpdatePayload,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::{scope, state};

/// Per-process context for publishing and syncing.
///
/// Cursors start at zero and live only here; a fresh process replays full
/// topic history on its first sync.
pub struct SyncContext {
    bus: Arc<dyn Bus>,
    cursors: HashMap<Topic, TopicCursor>,
    pub role: Actor,
    pub session_id: String,
    pub student_id: String,
    state_path: PathBuf,
    scope_root: PathBuf,
}

impl SyncContext {
    pub fn new(
        bus: Arc<dyn Bus>,
        role: Actor,
        session_id: impl Into<String>,
        student_id: impl Into<String>,
        state_path: PathBuf,
        scope_root: PathBuf,
    ) -> Self {
        let cursors = [
            Topic::Progress,
            Topic::Assignments,
            Topic::Feedback,
            Topic::Events,
        ]
        .into_iter()
        .map(|topic| (topic, TopicCursor::START))
        .collect();

        Self {
            bus,
            cursors,
            role,
            session_id: session_id.into(),
            student_id: student_id.into(),
            state_path,
            scope_root,
        }
    }

    /// Builds an envelope authored by this context. The active student id is
    /// always stamped into the payload so the other side can address-filter.
    pub fn build_event(&self, event_type: EventType, payload: Value) -> EventEnvelope {
        let mut map = payload.as_object().cloned().unwrap_or_default();
        map.insert("student_id".to_string(), json!(self.student_id));
        EventEnvelope::new(self.role, &self.session_id, event_type, map)
    }

    /// Validated publish with mirror fan-out.
    ///
    /// An envelope that fails validation never reaches the transport; the
    /// reason comes back as [`PublishOutcome::Rejected`]. Delivered events
    /// are copied to the `events` mirror unless they target it directly.
    pub async fn publish(
        &self,
        topic: Topic,
        event: &EventEnvelope,
    ) -> Result<PublishOutcome, colearn_bus::BusError> {
        if let Err(err) = validate(event) {
            return Ok(PublishOutcome::Rejected(err.to_string()));
        }
        self.bus.publish(topic, event).await?;
        if topic != Topic::Events {
            self.bus.publish(Topic::Events, event).await?;
        }
        Ok(PublishOutcome::Delivered)
    }

    /// The directional topics in consumption order for this role. The
    /// asymmetry is deliberate: each side reads the other side's primary
    /// output first.
    fn topic_order(&self) -> [Topic; 3] {
        match self.role {
            Actor::Coach => [Topic::Progress, Topic::Assignments, Topic::Feedback],
            Actor::Student => [Topic::Assignments, Topic::Feedback, Topic::Progress],
        }
    }

    /// Runs one sync cycle and returns one human-readable line per accepted
    /// event. Transport failures abort the whole cycle.
    pub async fn sync(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for topic in self.topic_order() {
            let cursor = self.cursors.get(&topic).copied().unwrap_or_default();
            let batch = self.bus.read_new(topic, cursor).await?;
            // The cursor advances past everything returned, including events
            // filtered out below; they are consumed, not deferred.
            self.cursors.insert(topic, batch.cursor);

            for event in batch.events {
                if event.session_id != self.session_id {
                    continue;
                }
                if validate(&event).is_err() {
                    continue;
                }
                self.handle_incoming(&event).await?;
                lines.push(format!(
                    "[{topic}] {} {}",
                    event.event_type,
                    Value::Object(event.payload.clone())
                ));
            }
        }
        Ok(lines)
    }

    /// Applies one delivered event to local state.
    async fn handle_incoming(&self, event: &EventEnvelope) -> Result<()> {
        // Actors never react to their own traffic.
        if event.actor == self.role {
            return Ok(());
        }
        // Events addressed to a different student are not ours to act on.
        if let Some(Value::String(student_id)) = event.payload.get("student_id") {
            if student_id != &self.student_id {
                return Ok(());
            }
        }

        match &event.event_type {
            EventType::EvidenceRequest if self.role == Actor::Student => {
                let Ok(request) = event.decode_payload::<EvidenceRequestPayload>() else {
                    return Ok(());
                };
                if !request.path.is_empty()
                    && scope::is_path_allowed(&request.path, &self.scope_root)
                {
                    let reply = self.build_event(
                        EventType::EvidenceSnapshot,
                        json!({ "path": request.path, "note": request.reason }),
                    );
                    self.publish(Topic::Progress, &reply).await?;
                } else {
                    debug!(path = %request.path, "evidence request outside scope root");
                }
            }
            EventType::LearningPlan => {
                if let Ok(plan) = event.decode_payload::<LearningPlanPayload>() {
                    state::apply_plan(&self.state_path, plan.plan)?;
                }
            }
            EventType::ProgressUpdate => {
                let update = event
                    .decode_payload::<ProgressUpdatePayload>()
                    .unwrap_or_default();
                state::apply_progress(&self.state_path, &update.completed, &update.confidence)?;
            }
            EventType::AssessmentFeedback => {
                if let Ok(feedback) = event.decode_payload::<AssessmentFeedbackPayload>() {
                    state::apply_confidence_delta(&self.state_path, feedback.confidence_delta)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
