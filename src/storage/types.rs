//! Records written by the commit protocol

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CatalogExerciseId, ExerciseId, SetId, SetTag, TemplateId, UserId, WorkoutId};

/// Header row of a committed workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub name: String,
    pub template_id: Option<TemplateId>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub total_volume: f64,
}

/// Exercise header row, child of a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: ExerciseId,
    pub workout_id: WorkoutId,
    pub catalog_exercise_id: CatalogExerciseId,
    pub exercise_name: String,
    pub notes: String,
    pub order: usize,
}

/// Completed set row, child of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: SetId,
    pub exercise_id: ExerciseId,
    pub set_number: u32,
    pub tag: SetTag,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub rpe: Option<f32>,
}

/// Summary used when listing a user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub record: WorkoutRecord,
    pub exercise_count: usize,
    pub set_count: usize,
}
