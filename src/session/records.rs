//! Personal-record evaluation for completed sets

use chrono::Utc;

use super::state::{PrEvent, SessionExercise};
use crate::scoring::{estimate_one_rep_max, is_personal_record};
use crate::types::{PrEventId, SetId};

/// Estimate for a weight/rep pair where either may be missing
fn estimate(weight: Option<f64>, reps: Option<i32>) -> f64 {
    match (weight, reps) {
        (Some(w), Some(r)) => estimate_one_rep_max(w, r),
        _ => 0.0,
    }
}

/// Compare the set at its current position against the set at the same
/// position in the previous snapshot.
///
/// Returns the PR event when the set beats it, `None` otherwise or when
/// the set is not part of this exercise.
pub fn evaluate_set(exercise: &SessionExercise, set_id: &SetId) -> Option<PrEvent> {
    let (index, set) = exercise
        .sets
        .iter()
        .enumerate()
        .find(|(_, s)| &s.id == set_id)?;

    let current = estimate(set.actual_weight, set.actual_reps);
    let previous = exercise
        .previous
        .as_ref()
        .and_then(|p| p.set_at(index))
        .map(|p| estimate(p.weight, p.reps));

    if !is_personal_record(current, previous) {
        return None;
    }

    Some(PrEvent {
        id: PrEventId::new(),
        exercise_id: exercise.id.clone(),
        set_id: set.id.clone(),
        estimated_one_rep_max: current,
        previous_estimate: previous.unwrap_or(0.0),
        achieved_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::WorkoutSet;
    use crate::types::{
        CatalogExercise, ExerciseId, PreviousPerformance, PreviousSet, SetTag, WorkoutId,
    };

    fn exercise_with(
        previous: Option<Vec<(f64, i32)>>,
        sets: Vec<(f64, i32)>,
    ) -> SessionExercise {
        SessionExercise {
            id: ExerciseId::new(),
            exercise: CatalogExercise::new("Bench Press"),
            notes: String::new(),
            order: 0,
            sets: sets
                .into_iter()
                .enumerate()
                .map(|(i, (w, r))| {
                    WorkoutSet::planned(i as u32 + 1, SetTag::Normal, Some(w), Some(r))
                })
                .collect(),
            previous: previous.map(|sets| PreviousPerformance {
                workout_id: WorkoutId::new(),
                performed_at: Utc::now(),
                sets: sets
                    .into_iter()
                    .map(|(w, r)| PreviousSet {
                        weight: Some(w),
                        reps: Some(r),
                    })
                    .collect(),
            }),
        }
    }

    #[test]
    fn test_beating_previous_set_is_a_pr() {
        let exercise = exercise_with(Some(vec![(90.0, 5)]), vec![(100.0, 5)]);
        let set_id = exercise.sets[0].id.clone();

        let event = evaluate_set(&exercise, &set_id).unwrap();
        assert!((event.estimated_one_rep_max - 116.666_67).abs() < 1e-3);
        assert!((event.previous_estimate - 105.0).abs() < 1e-9);
        assert_eq!(event.set_id, set_id);
    }

    #[test]
    fn test_matching_previous_is_not_a_pr() {
        let exercise = exercise_with(Some(vec![(100.0, 5)]), vec![(100.0, 5)]);
        assert!(evaluate_set(&exercise, &exercise.sets[0].id).is_none());
    }

    #[test]
    fn test_comparison_is_positional() {
        // Second set is compared to the second previous set, not the best one
        let exercise = exercise_with(
            Some(vec![(120.0, 5), (60.0, 10)]),
            vec![(50.0, 5), (70.0, 10)],
        );
        assert!(evaluate_set(&exercise, &exercise.sets[0].id).is_none());
        assert!(evaluate_set(&exercise, &exercise.sets[1].id).is_some());
    }

    #[test]
    fn test_no_history_counts_as_pr() {
        let exercise = exercise_with(None, vec![(40.0, 8)]);
        let event = evaluate_set(&exercise, &exercise.sets[0].id).unwrap();
        assert_eq!(event.previous_estimate, 0.0);

        // Extra sets beyond the previous snapshot have no history either
        let exercise = exercise_with(Some(vec![(100.0, 5)]), vec![(20.0, 5), (20.0, 5)]);
        assert!(evaluate_set(&exercise, &exercise.sets[1].id).is_some());
    }

    #[test]
    fn test_empty_set_is_never_a_pr() {
        let mut exercise = exercise_with(None, vec![(0.0, 5)]);
        assert!(evaluate_set(&exercise, &exercise.sets[0].id).is_none());

        exercise.sets[0].actual_weight = None;
        assert!(evaluate_set(&exercise, &exercise.sets[0].id).is_none());
    }

    #[test]
    fn test_unknown_set() {
        let exercise = exercise_with(None, vec![(100.0, 5)]);
        assert!(evaluate_set(&exercise, &SetId::new()).is_none());
    }
}
