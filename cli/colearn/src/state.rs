//! Local learning state: plan, completed steps, confidence scores.
//!
//! The state file is a projection of bus traffic, not a source of truth:
//! newer envelopes extend it (union-merge), they never rewrite history.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use colearn_events::PlanStep;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningState {
    pub learner: Learner,
    pub plan: Vec<PlanStep>,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Learner {
    pub level: String,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub completed: Vec<String>,
    pub confidence: BTreeMap<String, f64>,
}

impl Default for Learner {
    fn default() -> Self {
        Self {
            level: "intermediate".to_string(),
            goals: Vec::new(),
        }
    }
}

impl Default for LearningState {
    fn default() -> Self {
        Self {
            learner: Learner::default(),
            plan: Vec::new(),
            progress: Progress::default(),
        }
    }
}

/// Loads the state file; missing or unreadable state is the default state.
pub fn load(path: &Path) -> LearningState {
    let Ok(raw) = fs::read_to_string(path) else {
        return LearningState::default();
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

pub fn save(path: &Path, state: &LearningState) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(state)?)?;
    Ok(())
}

/// Replaces the stored plan and resets progress for the new plan.
pub fn apply_plan(path: &Path, plan: Vec<PlanStep>) -> Result<LearningState> {
    let mut state = load(path);
    state.plan = plan;
    state.progress = Progress::default();
    save(path, &state)?;
    Ok(state)
}

/// Union-merges completed step ids and overwrites confidence scores.
pub fn apply_progress(
    path: &Path,
    completed: &[String],
    confidence: &BTreeMap<String, f64>,
) -> Result<LearningState> {
    let mut state = load(path);
    for id in completed {
        if !state.progress.completed.contains(id) {
            state.progress.completed.push(id.clone());
        }
    }
    for (topic, score) in confidence {
        state.progress.confidence.insert(topic.clone(), *score);
    }
    save(path, &state)?;
    Ok(state)
}

/// Applies `delta` to every tracked confidence entry, clamped to [0, 1].
/// A zero delta leaves the file untouched.
pub fn apply_confidence_delta(path: &Path, delta: f64) -> Result<LearningState> {
    if delta == 0.0 {
        return Ok(load(path));
    }
    let state = load(path);
    let updated: BTreeMap<String, f64> = state
        .progress
        .confidence
        .iter()
        .map(|(topic, score)| (topic.clone(), (score + delta).clamp(0.0, 1.0)))
        .collect();
    apply_progress(path, &[], &updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn step(id: &str) -> PlanStep {
        PlanStep {
            id: id.to_string(),
            topic: format!("topic-{id}"),
            status: "pending".to_string(),
        }
    }

    #[test]
    fn test_load_missing_is_default() {
        let dir = tempdir().unwrap();
        let state = load(&dir.path().join("state.json"));
        assert_eq!(state, LearningState::default());
        assert_eq!(state.learner.level, "intermediate");
    }

    #[test]
    fn test_load_corrupt_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{broken").unwrap();
        assert_eq!(load(&path), LearningState::default());
    }

    #[test]
    fn test_apply_plan_resets_progress() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        apply_progress(
            &path,
            &["a".to_string()],
            &BTreeMap::from([("a".to_string(), 0.4)]),
        )
        .unwrap();

        let state = apply_plan(&path, vec![step("b")]).unwrap();
        assert_eq!(state.plan.len(), 1);
        assert!(state.progress.completed.is_empty());
        assert!(state.progress.confidence.is_empty());
    }

    #[test]
    fn test_apply_progress_unions_completed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        apply_progress(&path, &["a".to_string(), "b".to_string()], &BTreeMap::new()).unwrap();
        let state =
            apply_progress(&path, &["b".to_string(), "c".to_string()], &BTreeMap::new()).unwrap();
        assert_eq!(state.progress.completed, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_confidence_delta_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        apply_progress(
            &path,
            &[],
            &BTreeMap::from([("low".to_string(), 0.1), ("high".to_string(), 0.9)]),
        )
        .unwrap();

        let up = apply_confidence_delta(&path, 0.5).unwrap();
        assert!((up.progress.confidence["low"] - 0.6).abs() < 1e-9);
        assert_eq!(up.progress.confidence["high"], 1.0);

        let down = apply_confidence_delta(&path, -2.0).unwrap();
        assert_eq!(down.progress.confidence["high"], 0.0);
        assert_eq!(down.progress.confidence["low"], 0.0);
    }
}
