//! Commit protocol for a finished session
//!
//! Planning is pure: it turns a session snapshot into the rows to write.
//! Execution writes them in order (workout header, then per exercise its
//! header followed by its set batch). Only the workout header is fatal;
//! every later failure is absorbed into an [`ExerciseOutcome`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::state::Session;
use crate::error::{Result, WorkoutError};
use crate::scoring::total_volume;
use crate::storage::{
    ExerciseRecord, SetRecord, StorageError, StorageResult, WorkoutRecord, WorkoutStorage,
};
use crate::tasks::{spawn_detached, DetachedTask, FailurePolicy};
use crate::types::{ExerciseId, TemplateId, WorkoutId};

/// Rows for one exercise that has at least one completed set
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedExercise {
    pub record: ExerciseRecord,
    pub sets: Vec<SetRecord>,
}

/// Everything a finish will write, in write order
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPlan {
    pub workout: WorkoutRecord,
    pub exercises: Vec<PlannedExercise>,
}

/// Build the commit plan for `session`.
///
/// Exercises without a completed set are dropped. The survivors are
/// renumbered densely so persisted order has no gaps.
pub fn plan_commit(
    session: &Session,
    duration_seconds: u64,
    finished_at: DateTime<Utc>,
) -> CommitPlan {
    let exercises: Vec<PlannedExercise> = session
        .exercises
        .iter()
        .filter(|e| e.has_completed_sets())
        .enumerate()
        .map(|(order, exercise)| PlannedExercise {
            record: ExerciseRecord {
                id: exercise.id.clone(),
                workout_id: session.id.clone(),
                catalog_exercise_id: exercise.exercise.id.clone(),
                exercise_name: exercise.exercise.name.clone(),
                notes: exercise.notes.clone(),
                order,
            },
            sets: exercise
                .completed_sets()
                .map(|set| SetRecord {
                    id: set.id.clone(),
                    exercise_id: exercise.id.clone(),
                    set_number: set.set_number,
                    tag: set.tag,
                    weight: set.actual_weight,
                    reps: set.actual_reps,
                    rpe: set.rpe,
                })
                .collect(),
        })
        .collect();

    let volume = total_volume(
        exercises
            .iter()
            .flat_map(|e| e.sets.iter().map(|s| (s.weight, s.reps))),
    );

    CommitPlan {
        workout: WorkoutRecord {
            id: session.id.clone(),
            user_id: session.user_id.clone(),
            name: session.name.clone(),
            template_id: session.template_id.clone(),
            started_at: session.started_at,
            finished_at,
            duration_seconds,
            total_volume: volume,
        },
        exercises,
    }
}

/// How one exercise fared during commit
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseCommitStatus {
    /// Header and all `sets` were written
    Persisted { sets: usize },
    /// Header write failed; sets were not attempted
    HeaderFailed { error: String },
    /// Header was written but the set batch failed
    SetsFailed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseOutcome {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub status: ExerciseCommitStatus,
}

impl ExerciseOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self.status, ExerciseCommitStatus::Persisted { .. })
    }
}

/// Result of a successful finish
#[derive(Debug)]
pub struct CommitReport {
    pub workout_id: WorkoutId,
    pub total_volume: f64,
    pub duration_seconds: u64,
    pub exercises: Vec<ExerciseOutcome>,
    /// Background update of the template's last-used time
    pub template_touch: Option<DetachedTask>,
}

impl CommitReport {
    pub fn persisted_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.is_persisted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.exercises.len() - self.persisted_count()
    }

    /// Total sets written across persisted exercises
    pub fn persisted_sets(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| match e.status {
                ExerciseCommitStatus::Persisted { sets } => sets,
                _ => 0,
            })
            .sum()
    }
}

async fn bounded<T, F>(limit: Duration, write: F) -> StorageResult<T>
where
    F: std::future::Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(limit, write).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(limit)),
    }
}

/// Write the workout header. The only fatal step of the protocol.
///
/// The header id is the session id, so a duplicate means an earlier attempt
/// landed after its acknowledgement was lost; that counts as written.
pub async fn write_header(
    storage: &dyn WorkoutStorage,
    workout: &WorkoutRecord,
    limit: Duration,
) -> Result<WorkoutId> {
    match bounded(limit, storage.insert_workout(workout)).await {
        Ok(id) => {
            debug!("Workout header {} written", id);
            Ok(id)
        }
        Err(StorageError::Duplicate { .. }) => {
            warn!(
                "Workout header {} already stored by an earlier attempt",
                workout.id
            );
            Ok(workout.id.clone())
        }
        Err(StorageError::Timeout(limit)) => {
            error!(
                "Workout header {} write timed out after {:?}",
                workout.id, limit
            );
            Err(WorkoutError::CommitTimeout(limit))
        }
        Err(e) => {
            error!("Failed to write workout header {}: {}", workout.id, e);
            Err(WorkoutError::HeaderWrite(e))
        }
    }
}

/// Write each exercise header followed by its set batch.
///
/// Writes are sequential. A failed header skips that exercise's sets; no
/// failure stops the remaining exercises.
pub async fn write_exercises(
    storage: &dyn WorkoutStorage,
    workout_id: &WorkoutId,
    exercises: Vec<PlannedExercise>,
    limit: Duration,
) -> Vec<ExerciseOutcome> {
    let mut outcomes = Vec::with_capacity(exercises.len());

    for PlannedExercise { mut record, sets } in exercises {
        record.workout_id = workout_id.clone();
        let exercise_id = record.id.clone();
        let exercise_name = record.exercise_name.clone();

        let status = match bounded(limit, storage.insert_exercise(&record)).await {
            Err(e) => {
                warn!(
                    "Dropping exercise '{}' ({}): header write failed: {}",
                    exercise_name, exercise_id, e
                );
                ExerciseCommitStatus::HeaderFailed {
                    error: e.to_string(),
                }
            }
            Ok(()) => match bounded(limit, storage.insert_sets(&sets)).await {
                Ok(()) => ExerciseCommitStatus::Persisted { sets: sets.len() },
                Err(e) => {
                    warn!(
                        "Dropping {} sets of exercise '{}' ({}): {}",
                        sets.len(),
                        exercise_name,
                        exercise_id,
                        e
                    );
                    ExerciseCommitStatus::SetsFailed {
                        error: e.to_string(),
                    }
                }
            },
        };

        outcomes.push(ExerciseOutcome {
            exercise_id,
            exercise_name,
            status,
        });
    }

    outcomes
}

/// Update the template's last-used time in the background
pub fn touch_template(
    storage: Arc<dyn WorkoutStorage>,
    template_id: TemplateId,
    used_at: DateTime<Utc>,
) -> DetachedTask {
    spawn_detached(
        format!("touch-template-{template_id}"),
        FailurePolicy::Ignore,
        async move { storage.touch_template(&template_id, used_at).await },
    )
}

/// Run the whole protocol for a session snapshot.
///
/// Returns an error only when the workout header could not be written.
pub async fn commit(
    storage: Arc<dyn WorkoutStorage>,
    session: &Session,
    duration_seconds: u64,
    commit_timeout: Duration,
    write_timeout: Duration,
) -> Result<CommitReport> {
    let finished_at = Utc::now();
    let plan = plan_commit(session, duration_seconds, finished_at);
    let CommitPlan { workout, exercises } = plan;

    let workout_id = write_header(&*storage, &workout, commit_timeout).await?;
    let outcomes = write_exercises(&*storage, &workout_id, exercises, write_timeout).await;

    let template_touch = session
        .template_id
        .clone()
        .map(|template_id| touch_template(storage.clone(), template_id, finished_at));

    let report = CommitReport {
        workout_id,
        total_volume: workout.total_volume,
        duration_seconds,
        exercises: outcomes,
        template_touch,
    };

    info!(
        "Committed workout '{}' ({}): volume {}, {} exercises persisted, {} dropped",
        workout.name,
        report.workout_id,
        report.total_volume,
        report.persisted_count(),
        report.failed_count()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::lifecycle::build_exercise;
    use crate::session::state::SetStatus;
    use crate::types::{CatalogExercise, SetTag, UserId};

    fn session() -> Session {
        let mut session = Session::new("Leg Day", UserId::new());
        for (order, name) in ["Squat", "Leg Press", "Calf Raise"].iter().enumerate() {
            session
                .exercises
                .push(build_exercise(CatalogExercise::new(*name), None, order));
        }
        session
    }

    fn complete(session: &mut Session, exercise: usize, weight: f64, reps: i32) {
        let set = &mut session.exercises[exercise].sets[0];
        set.actual_weight = Some(weight);
        set.actual_reps = Some(reps);
        set.status = SetStatus::Completed;
    }

    #[test]
    fn test_plan_drops_exercises_without_completed_sets() {
        let mut session = session();
        complete(&mut session, 0, 100.0, 5);
        complete(&mut session, 2, 40.0, 15);

        let plan = plan_commit(&session, 1800, Utc::now());

        assert_eq!(plan.exercises.len(), 2);
        assert_eq!(plan.exercises[0].record.exercise_name, "Squat");
        assert_eq!(plan.exercises[1].record.exercise_name, "Calf Raise");
        // Dense order among persisted exercises
        assert_eq!(plan.exercises[1].record.order, 1);
        assert_eq!(plan.workout.total_volume, 1100.0);
        assert_eq!(plan.workout.duration_seconds, 1800);
    }

    #[test]
    fn test_plan_only_includes_completed_sets() {
        let mut session = session();
        let squat = session.exercises[0].id.clone();
        session.exercises[0].sets.push(crate::session::state::WorkoutSet::planned(
            2,
            SetTag::Working,
            Some(120.0),
            Some(3),
        ));
        complete(&mut session, 0, 100.0, 5);

        let plan = plan_commit(&session, 0, Utc::now());
        let sets = &plan.exercises[0].sets;
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].exercise_id, squat);
        assert_eq!(sets[0].weight, Some(100.0));
        assert_eq!(plan.workout.total_volume, 500.0);
    }

    #[test]
    fn test_plan_counts_missing_values_as_zero() {
        let mut session = session();
        complete(&mut session, 0, 100.0, 5);
        session.exercises[0].sets[0].actual_reps = None;

        let plan = plan_commit(&session, 0, Utc::now());
        assert_eq!(plan.exercises.len(), 1);
        assert_eq!(plan.workout.total_volume, 0.0);
    }

    #[test]
    fn test_plan_copies_header_fields() {
        let session = session();
        let finished_at = Utc::now();
        let plan = plan_commit(&session, 42, finished_at);

        assert_eq!(plan.workout.id, session.id);
        assert_eq!(plan.workout.user_id, session.user_id);
        assert_eq!(plan.workout.name, "Leg Day");
        assert_eq!(plan.workout.started_at, session.started_at);
        assert_eq!(plan.workout.finished_at, finished_at);
        assert!(plan.exercises.is_empty());
    }

    #[tokio::test]
    async fn test_header_already_stored_counts_as_written() {
        let storage = crate::storage::MemoryBackend::new();
        let plan = plan_commit(&session(), 60, Utc::now());
        storage.insert_workout(&plan.workout).await.unwrap();

        let id = write_header(&storage, &plan.workout, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(id, plan.workout.id);
        assert_eq!(storage.workout_count().await, 1);
    }

    #[tokio::test]
    async fn test_header_rejection_is_fatal() {
        let storage = crate::testing::MockWorkoutStorage::new();
        storage.fail_header(true);
        let plan = plan_commit(&session(), 60, Utc::now());

        let err = write_header(&storage, &plan.workout, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkoutError::HeaderWrite(_)));
    }

    #[test]
    fn test_report_counts() {
        let outcome = |status| ExerciseOutcome {
            exercise_id: ExerciseId::new(),
            exercise_name: "x".to_string(),
            status,
        };
        let report = CommitReport {
            workout_id: WorkoutId::new(),
            total_volume: 0.0,
            duration_seconds: 0,
            exercises: vec![
                outcome(ExerciseCommitStatus::Persisted { sets: 3 }),
                outcome(ExerciseCommitStatus::HeaderFailed {
                    error: "down".into(),
                }),
                outcome(ExerciseCommitStatus::SetsFailed {
                    error: "down".into(),
                }),
                outcome(ExerciseCommitStatus::Persisted { sets: 2 }),
            ],
            template_touch: None,
        };
        assert_eq!(report.persisted_count(), 2);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.persisted_sets(), 5);
    }
}
