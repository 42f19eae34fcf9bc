//! Storage backend implementations

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use super::types::{ExerciseRecord, SetRecord, WorkoutRecord};
use crate::types::{CatalogExerciseId, PreviousPerformance, PreviousSet, UserId};

/// Pick the latest performance of `exercise` by `user` out of loaded rows.
///
/// Workouts are compared by finish time; within the winning workout the
/// first exercise entry for the catalog item is used and its sets are
/// returned in set-number order.
pub(crate) fn latest_performance<'a>(
    workouts: impl IntoIterator<Item = &'a WorkoutRecord>,
    exercises: &[ExerciseRecord],
    sets: &[SetRecord],
    exercise: &CatalogExerciseId,
    user: &UserId,
) -> Option<PreviousPerformance> {
    let mut candidates: Vec<&WorkoutRecord> = workouts
        .into_iter()
        .filter(|w| &w.user_id == user)
        .collect();
    candidates.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));

    candidates.into_iter().find_map(|workout| {
        let entry = exercises
            .iter()
            .filter(|e| e.workout_id == workout.id && &e.catalog_exercise_id == exercise)
            .min_by_key(|e| e.order)?;

        let mut performed: Vec<&SetRecord> =
            sets.iter().filter(|s| s.exercise_id == entry.id).collect();
        performed.sort_by_key(|s| s.set_number);

        Some(PreviousPerformance {
            workout_id: workout.id.clone(),
            performed_at: workout.finished_at,
            sets: performed
                .into_iter()
                .map(|s| PreviousSet {
                    weight: s.weight,
                    reps: s.reps,
                })
                .collect(),
        })
    })
}
