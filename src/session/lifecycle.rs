//! Building sessions and exercises (pure functions)

use std::collections::HashMap;

use super::state::{Session, SessionExercise, WorkoutSet};
use crate::types::{
    CatalogExercise, CatalogExerciseId, ExerciseId, PreviousPerformance, SetTag, UserId,
    WorkoutTemplate,
};

/// A session with no exercises
pub fn build_empty(name: impl Into<String>, user_id: UserId) -> Session {
    Session::new(name, user_id)
}

/// Deep-copy a template into a fresh session.
///
/// Each template set becomes a pending set numbered by position, with
/// actuals pre-filled from targets and a missing tag defaulted to normal.
/// `previous` supplies history snapshots keyed by catalog exercise.
pub fn build_from_template(
    template: &WorkoutTemplate,
    user_id: UserId,
    previous: &HashMap<CatalogExerciseId, PreviousPerformance>,
) -> Session {
    let mut session = Session::new(template.name.clone(), user_id);
    session.template_id = Some(template.id.clone());
    session.exercises = template
        .exercises
        .iter()
        .enumerate()
        .map(|(order, planned)| SessionExercise {
            id: ExerciseId::new(),
            exercise: planned.exercise.clone(),
            notes: planned.notes.clone(),
            order,
            sets: planned
                .sets
                .iter()
                .enumerate()
                .map(|(i, set)| {
                    WorkoutSet::planned(
                        i as u32 + 1,
                        set.tag.unwrap_or_default(),
                        set.target_weight,
                        set.target_reps,
                    )
                })
                .collect(),
            previous: previous.get(&planned.exercise.id).cloned(),
        })
        .collect();
    session
}

/// A new exercise appended at `order`.
///
/// With history, one pending set is synthesized per previous set, carrying
/// its weight and reps forward as targets. Without history a single blank
/// pending set is created.
pub fn build_exercise(
    exercise: CatalogExercise,
    previous: Option<PreviousPerformance>,
    order: usize,
) -> SessionExercise {
    let sets = match &previous {
        Some(history) if !history.sets.is_empty() => history
            .sets
            .iter()
            .enumerate()
            .map(|(i, set)| {
                WorkoutSet::planned(i as u32 + 1, SetTag::Normal, set.weight, set.reps)
            })
            .collect(),
        _ => vec![WorkoutSet::planned(1, SetTag::Normal, None, None)],
    };

    SessionExercise {
        id: ExerciseId::new(),
        exercise,
        notes: String::new(),
        order,
        sets,
        previous,
    }
}
