//! Live workout session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    CatalogExercise, ExerciseId, PrEventId, PreviousPerformance, SetId, SetTag, TemplateId,
    UserId, WorkoutId,
};

/// Progress of a single set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

/// One set inside a live exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: SetId,
    /// 1-based position within the exercise
    pub set_number: u32,
    pub tag: SetTag,
    pub target_weight: Option<f64>,
    pub target_reps: Option<i32>,
    pub actual_weight: Option<f64>,
    pub actual_reps: Option<i32>,
    /// Subjective effort rating
    pub rpe: Option<f32>,
    pub status: SetStatus,
}

impl WorkoutSet {
    /// A pending set with the given targets, actuals pre-filled from them
    pub fn planned(
        set_number: u32,
        tag: SetTag,
        target_weight: Option<f64>,
        target_reps: Option<i32>,
    ) -> Self {
        Self {
            id: SetId::new(),
            set_number,
            tag,
            target_weight,
            target_reps,
            actual_weight: target_weight,
            actual_reps: target_reps,
            rpe: None,
            status: SetStatus::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SetStatus::Completed
    }
}

/// Partial update merged into a set by `update_set`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetPatch {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub tag: Option<SetTag>,
    #[serde(default)]
    pub rpe: Option<f32>,
}

impl SetPatch {
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn reps(mut self, reps: i32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn tag(mut self, tag: SetTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn rpe(mut self, rpe: f32) -> Self {
        self.rpe = Some(rpe);
        self
    }
}

/// One exercise inside a live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub id: ExerciseId,
    pub exercise: CatalogExercise,
    pub notes: String,
    /// Dense 0-based display order
    pub order: usize,
    pub sets: Vec<WorkoutSet>,
    /// Snapshot of the previous performance; read-only
    pub previous: Option<PreviousPerformance>,
}

impl SessionExercise {
    pub fn find_set(&self, set_id: &SetId) -> Option<&WorkoutSet> {
        self.sets.iter().find(|s| &s.id == set_id)
    }

    pub fn completed_sets(&self) -> impl Iterator<Item = &WorkoutSet> {
        self.sets.iter().filter(|s| s.is_completed())
    }

    pub fn has_completed_sets(&self) -> bool {
        self.sets.iter().any(WorkoutSet::is_completed)
    }
}

/// A personal record hit during the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrEvent {
    pub id: PrEventId,
    pub exercise_id: ExerciseId,
    pub set_id: SetId,
    pub estimated_one_rep_max: f64,
    pub previous_estimate: f64,
    pub achieved_at: DateTime<Utc>,
}

/// The one live workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub name: String,
    pub template_id: Option<TemplateId>,
    pub started_at: DateTime<Utc>,
    pub exercises: Vec<SessionExercise>,
    pub pr_events: Vec<PrEvent>,
}

impl Session {
    pub fn new(name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            id: WorkoutId::new(),
            user_id,
            name: name.into(),
            template_id: None,
            started_at: Utc::now(),
            exercises: Vec::new(),
            pr_events: Vec::new(),
        }
    }

    pub fn find_exercise(&self, exercise_id: &ExerciseId) -> Option<&SessionExercise> {
        self.exercises.iter().find(|e| &e.id == exercise_id)
    }

    pub(crate) fn find_exercise_mut(
        &mut self,
        exercise_id: &ExerciseId,
    ) -> Option<&mut SessionExercise> {
        self.exercises.iter_mut().find(|e| &e.id == exercise_id)
    }

    pub fn completed_set_count(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| e.completed_sets().count())
            .sum()
    }
}

/// Snapshot of the rest countdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTimerState {
    pub running: bool,
    pub remaining_seconds: u32,
    /// Denominator for progress display
    pub total_seconds: u32,
    pub exercise_id: Option<ExerciseId>,
}

impl RestTimerState {
    /// Fraction of the rest period already elapsed, 0.0 when idle
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - f64::from(self.remaining_seconds) / f64::from(self.total_seconds)
    }
}
