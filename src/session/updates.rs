//! Pure functions for applying mutations to a live session
//!
//! Every function is total: an unknown exercise or set id leaves the
//! session untouched and reports that nothing happened.

use super::records::evaluate_set;
use super::state::{PrEvent, Session, SessionExercise, SetPatch, SetStatus, WorkoutSet};
use crate::types::{ExerciseId, SetId, SetTag};

/// Result of completing a set
#[derive(Debug, Clone, PartialEq)]
pub struct SetCompletion {
    pub exercise_id: ExerciseId,
    pub set_id: SetId,
    /// Present when the set beat the previous performance
    pub personal_record: Option<PrEvent>,
}

fn find_set_mut<'a>(
    session: &'a mut Session,
    exercise_id: &ExerciseId,
    set_id: &SetId,
) -> Option<&'a mut WorkoutSet> {
    session
        .find_exercise_mut(exercise_id)?
        .sets
        .iter_mut()
        .find(|s| &s.id == set_id)
}

fn renumber_sets(exercise: &mut SessionExercise) {
    for (i, set) in exercise.sets.iter_mut().enumerate() {
        set.set_number = i as u32 + 1;
    }
}

fn renumber_exercises(session: &mut Session) {
    for (i, exercise) in session.exercises.iter_mut().enumerate() {
        exercise.order = i;
    }
}

/// Mark a set completed and record a PR if it earned one.
///
/// Completion is one-way; completing an already completed set is a no-op.
pub fn apply_complete_set(
    session: &mut Session,
    exercise_id: &ExerciseId,
    set_id: &SetId,
) -> Option<SetCompletion> {
    let set = find_set_mut(session, exercise_id, set_id)?;
    if set.is_completed() {
        return None;
    }
    set.status = SetStatus::Completed;

    let personal_record = session
        .find_exercise(exercise_id)
        .and_then(|exercise| evaluate_set(exercise, set_id));
    if let Some(event) = &personal_record {
        session.pr_events.push(event.clone());
    }

    Some(SetCompletion {
        exercise_id: exercise_id.clone(),
        set_id: set_id.clone(),
        personal_record,
    })
}

/// Mark a pending set skipped
pub fn apply_skip_set(session: &mut Session, exercise_id: &ExerciseId, set_id: &SetId) -> bool {
    match find_set_mut(session, exercise_id, set_id) {
        Some(set) if set.status == SetStatus::Pending => {
            set.status = SetStatus::Skipped;
            true
        }
        _ => false,
    }
}

/// Merge a patch into a set. Values are not range checked.
///
/// Actual weight and reps are frozen once the set is completed; tag and
/// effort rating stay editable.
pub fn apply_set_patch(
    session: &mut Session,
    exercise_id: &ExerciseId,
    set_id: &SetId,
    patch: SetPatch,
) -> bool {
    let Some(set) = find_set_mut(session, exercise_id, set_id) else {
        return false;
    };

    if !set.is_completed() {
        if let Some(weight) = patch.weight {
            set.actual_weight = Some(weight);
        }
        if let Some(reps) = patch.reps {
            set.actual_reps = Some(reps);
        }
    }
    if let Some(tag) = patch.tag {
        set.tag = tag;
    }
    if let Some(rpe) = patch.rpe {
        set.rpe = Some(rpe);
    }
    true
}

/// Append a pending set whose targets drag forward from the last set
pub fn apply_add_set(session: &mut Session, exercise_id: &ExerciseId) -> Option<SetId> {
    let exercise = session.find_exercise_mut(exercise_id)?;
    let (target_weight, target_reps) = exercise
        .sets
        .last()
        .map(|last| (last.target_weight, last.target_reps))
        .unwrap_or((None, None));

    let set = WorkoutSet::planned(
        exercise.sets.len() as u32 + 1,
        SetTag::Normal,
        target_weight,
        target_reps,
    );
    let id = set.id.clone();
    exercise.sets.push(set);
    Some(id)
}

/// Remove a set and renumber the rest
pub fn apply_remove_set(session: &mut Session, exercise_id: &ExerciseId, set_id: &SetId) -> bool {
    let Some(exercise) = session.find_exercise_mut(exercise_id) else {
        return false;
    };
    let before = exercise.sets.len();
    exercise.sets.retain(|s| &s.id != set_id);
    if exercise.sets.len() == before {
        return false;
    }
    renumber_sets(exercise);
    true
}

/// Replace an exercise's free-text notes
pub fn apply_exercise_notes(
    session: &mut Session,
    exercise_id: &ExerciseId,
    notes: String,
) -> bool {
    match session.find_exercise_mut(exercise_id) {
        Some(exercise) => {
            exercise.notes = notes;
            true
        }
        None => false,
    }
}

/// Append an exercise at the end of the session
pub fn apply_add_exercise(session: &mut Session, mut exercise: SessionExercise) -> ExerciseId {
    exercise.order = session.exercises.len();
    let id = exercise.id.clone();
    session.exercises.push(exercise);
    id
}

/// Remove an exercise with all its sets and close the order gap
pub fn apply_remove_exercise(session: &mut Session, exercise_id: &ExerciseId) -> bool {
    let before = session.exercises.len();
    session.exercises.retain(|e| &e.id != exercise_id);
    if session.exercises.len() == before {
        return false;
    }
    renumber_exercises(session);
    true
}
