//! Builders for test data

use chrono::{DateTime, Utc};

use crate::storage::{ExerciseRecord, SetRecord, StorageResult, WorkoutRecord, WorkoutStorage};
use crate::types::{
    CatalogExercise, ExerciseId, PreviousPerformance, PreviousSet, SetId, SetTag,
    TemplateExercise, TemplateId, TemplateSet, UserId, WorkoutId, WorkoutTemplate,
};

/// Catalog exercise with a fresh id
pub fn catalog(name: &str) -> CatalogExercise {
    CatalogExercise::new(name)
}

/// Template exercise with one normal set per `(weight, reps)` pair
pub fn template_exercise(exercise: CatalogExercise, sets: &[(f64, i32)]) -> TemplateExercise {
    TemplateExercise {
        exercise,
        notes: String::new(),
        sets: sets
            .iter()
            .map(|&(weight, reps)| TemplateSet {
                tag: None,
                target_weight: Some(weight),
                target_reps: Some(reps),
            })
            .collect(),
    }
}

/// Template owned by `user_id`
pub fn template(name: &str, user_id: UserId, exercises: Vec<TemplateExercise>) -> WorkoutTemplate {
    WorkoutTemplate {
        id: TemplateId::new(),
        user_id,
        name: name.to_string(),
        exercises,
        last_used_at: None,
    }
}

/// Previous-performance snapshot from a made-up earlier workout
pub fn previous_performance(sets: &[(f64, i32)]) -> PreviousPerformance {
    PreviousPerformance {
        workout_id: WorkoutId::new(),
        performed_at: Utc::now(),
        sets: sets
            .iter()
            .map(|&(weight, reps)| PreviousSet {
                weight: Some(weight),
                reps: Some(reps),
            })
            .collect(),
    }
}

/// Write a finished single-exercise workout straight to storage
pub async fn seed_workout(
    storage: &dyn WorkoutStorage,
    user_id: &UserId,
    exercise: &CatalogExercise,
    sets: &[(f64, i32)],
    finished_at: DateTime<Utc>,
) -> StorageResult<WorkoutId> {
    let workout = WorkoutRecord {
        id: WorkoutId::new(),
        user_id: user_id.clone(),
        name: format!("{} history", exercise.name),
        template_id: None,
        started_at: finished_at,
        finished_at,
        duration_seconds: 0,
        total_volume: crate::scoring::total_volume(
            sets.iter().map(|&(w, r)| (Some(w), Some(r))),
        ),
    };
    let workout_id = storage.insert_workout(&workout).await?;

    let record = ExerciseRecord {
        id: ExerciseId::new(),
        workout_id: workout_id.clone(),
        catalog_exercise_id: exercise.id.clone(),
        exercise_name: exercise.name.clone(),
        notes: String::new(),
        order: 0,
    };
    storage.insert_exercise(&record).await?;

    let set_records: Vec<SetRecord> = sets
        .iter()
        .enumerate()
        .map(|(i, &(weight, reps))| SetRecord {
            id: SetId::new(),
            exercise_id: record.id.clone(),
            set_number: i as u32 + 1,
            tag: SetTag::Normal,
            weight: Some(weight),
            reps: Some(reps),
            rpe: None,
        })
        .collect();
    storage.insert_sets(&set_records).await?;

    Ok(workout_id)
}
