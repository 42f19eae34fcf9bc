//! Replaying a scripted workout through the engine
//!
//! A script names the workout, its exercises and the sets performed. The
//! replay starts a session (from a template built out of the script when
//! `from_template` is set), fills in and completes each set, advances the
//! elapsed clock, and finishes.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::session::{CommitReport, PrEvent, SessionManager, SetPatch};
use crate::types::{
    CatalogExercise, CatalogExerciseId, SetTag, TemplateExercise, TemplateId, TemplateSet, UserId,
    WorkoutTemplate,
};

fn default_user() -> String {
    "local".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub name: String,
    #[serde(default = "default_user")]
    pub user: String,
    /// Seed the session from a template built out of this script
    #[serde(default)]
    pub from_template: bool,
    /// Seconds to advance the elapsed clock before finishing
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub exercises: Vec<ScriptExercise>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptExercise {
    pub name: String,
    /// Catalog id; derived from the name when absent
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sets: Vec<ScriptSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptSet {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub tag: Option<SetTag>,
    #[serde(default)]
    pub rpe: Option<f32>,
    /// Skipped instead of completed when false
    #[serde(default = "default_true")]
    pub completed: bool,
}

impl ReplayScript {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse workout script")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read workout script {}", path.display()))?;
        Self::from_yaml(&content)
    }

    fn user_id(&self) -> UserId {
        UserId::from_string(self.user.clone())
    }

    fn template(&self) -> WorkoutTemplate {
        WorkoutTemplate {
            id: TemplateId::from_string(format!("template-{}", slug(&self.name))),
            user_id: self.user_id(),
            name: self.name.clone(),
            exercises: self
                .exercises
                .iter()
                .map(|e| TemplateExercise {
                    exercise: e.catalog(),
                    notes: e.notes.clone(),
                    sets: e
                        .sets
                        .iter()
                        .map(|s| TemplateSet {
                            tag: s.tag,
                            target_weight: s.weight,
                            target_reps: s.reps,
                        })
                        .collect(),
                })
                .collect(),
            last_used_at: None,
        }
    }
}

impl ScriptExercise {
    fn catalog(&self) -> CatalogExercise {
        let id = self.id.clone().unwrap_or_else(|| slug(&self.name));
        CatalogExercise {
            id: CatalogExerciseId::from_string(id),
            name: self.name.clone(),
            muscle_groups: self.muscle_groups.clone(),
        }
    }
}

/// Stable lowercase identifier derived from a display name
fn slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Outcome of a replay
#[derive(Debug)]
pub struct ReplayOutcome {
    pub report: CommitReport,
    /// Exercise name with each PR hit during the replay
    pub personal_records: Vec<(String, PrEvent)>,
}

/// Run `script` through `manager` and commit the result
pub async fn run_replay(manager: &SessionManager, script: &ReplayScript) -> Result<ReplayOutcome> {
    let user = script.user_id();

    if script.from_template {
        let template = script.template();
        manager
            .storage()
            .save_template(&template)
            .await
            .context("Failed to save workout template")?;
        manager.start_from_template(&template, user).await?;
    } else {
        manager.start_empty(script.name.clone(), user)?;
        for exercise in &script.exercises {
            manager.add_exercise_with_history(exercise.catalog()).await;
        }
    }

    let mut personal_records = Vec::new();
    let session = manager
        .session()
        .context("Session disappeared during replay")?;

    for (planned, live) in script.exercises.iter().zip(&session.exercises) {
        if !planned.notes.is_empty() {
            manager.update_exercise_notes(&live.id, planned.notes.clone());
        }

        let mut set_ids: Vec<_> = live.sets.iter().map(|s| s.id.clone()).collect();
        while set_ids.len() < planned.sets.len() {
            match manager.add_set(&live.id) {
                Some(id) => set_ids.push(id),
                None => break,
            }
        }

        for (set, set_id) in planned.sets.iter().zip(&set_ids) {
            let patch = SetPatch {
                weight: set.weight,
                reps: set.reps,
                tag: set.tag,
                rpe: set.rpe,
            };
            manager.update_set(&live.id, set_id, patch);

            if !set.completed {
                manager.skip_set(&live.id, set_id);
                continue;
            }
            if let Some(completion) = manager.complete_set(&live.id, set_id) {
                if let Some(pr) = completion.personal_record {
                    personal_records.push((planned.name.clone(), pr));
                }
            }
        }
    }

    debug!("Advancing elapsed clock by {}s", script.elapsed_seconds);
    for _ in 0..script.elapsed_seconds {
        manager.tick();
    }

    let mut report = manager.finish().await?;
    if let Some(task) = report.template_touch.take() {
        task.join().await;
    }

    Ok(ReplayOutcome {
        report,
        personal_records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::storage::{MemoryBackend, WorkoutStorage};
    use std::sync::Arc;

    const SCRIPT: &str = r#"
name: Leg Day
user: alice
elapsed_seconds: 2700
exercises:
  - name: Back Squat
    muscle_groups: [quads, glutes]
    sets:
      - { weight: 100, reps: 5 }
      - { weight: 100, reps: 5 }
      - { weight: 100, reps: 5, completed: false }
  - name: Leg Curl
    sets:
      - { weight: 40, reps: 12, tag: working, rpe: 8 }
"#;

    fn manager() -> (Arc<MemoryBackend>, SessionManager) {
        let storage = Arc::new(MemoryBackend::new());
        let manager = SessionManager::new(storage.clone(), EngineConfig::default());
        (storage, manager)
    }

    #[test]
    fn test_parse_script_defaults() {
        let script = ReplayScript::from_yaml("name: Quick\n").unwrap();
        assert_eq!(script.user, "local");
        assert!(!script.from_template);
        assert!(script.exercises.is_empty());

        let script = ReplayScript::from_yaml(SCRIPT).unwrap();
        assert_eq!(script.exercises[0].sets.len(), 3);
        assert!(!script.exercises[0].sets[2].completed);
        assert_eq!(script.exercises[1].sets[0].tag, Some(SetTag::Working));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Back Squat"), "back-squat");
        assert_eq!(slug("  Romanian  Deadlift (RDL) "), "romanian-deadlift-rdl");
    }

    #[tokio::test]
    async fn test_replay_commits_completed_sets() {
        let (storage, manager) = manager();
        let script = ReplayScript::from_yaml(SCRIPT).unwrap();

        let outcome = run_replay(&manager, &script).await.unwrap();

        assert_eq!(outcome.report.total_volume, 1480.0);
        assert_eq!(outcome.report.duration_seconds, 2700);
        assert_eq!(outcome.report.persisted_sets(), 3);
        // No history yet, so every completed set is a PR
        assert_eq!(outcome.personal_records.len(), 3);
        assert!(manager.session().is_none());

        let history = storage
            .list_workouts(&UserId::from_string("alice"))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_second_replay_sees_history() {
        let (storage, manager) = manager();
        let script = ReplayScript::from_yaml(SCRIPT).unwrap();
        run_replay(&manager, &script).await.unwrap();

        let outcome = run_replay(&manager, &script).await.unwrap();
        // Same numbers as last time: no PRs
        assert!(outcome.personal_records.is_empty());

        let previous = storage
            .previous_performance(
                &CatalogExerciseId::from_string("back-squat"),
                &UserId::from_string("alice"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(previous.sets.len(), 2);
    }

    #[tokio::test]
    async fn test_replay_from_template_touches_it() {
        let (storage, manager) = manager();
        let mut script = ReplayScript::from_yaml(SCRIPT).unwrap();
        script.from_template = true;

        let outcome = run_replay(&manager, &script).await.unwrap();
        assert_eq!(outcome.report.persisted_count(), 2);

        let template = storage
            .load_template(&TemplateId::from_string("template-leg-day"))
            .await
            .unwrap()
            .unwrap();
        assert!(template.last_used_at.is_some());
    }
}
