//! Mock storage with failure injection and a call log

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::nutrition::MealEntry;
use crate::storage::{
    ExerciseRecord, MealStorage, MemoryBackend, SetRecord, StorageError, StorageResult,
    WorkoutRecord, WorkoutStorage, WorkoutSummary,
};
use crate::sync::lock;
use crate::types::{
    CatalogExerciseId, ExerciseId, MealId, PreviousPerformance, TemplateId, UserId, WorkoutId,
    WorkoutTemplate,
};

/// One call made against the mock, recorded before any injected failure
#[derive(Debug, Clone, PartialEq)]
pub enum StorageCall {
    InsertWorkout(WorkoutId),
    InsertExercise(ExerciseId),
    InsertSets { exercise_id: ExerciseId, count: usize },
    TouchTemplate(TemplateId),
    PreviousPerformance(CatalogExerciseId),
    InsertMeal(MealId),
    DeleteMeal(MealId),
}

#[derive(Debug, Default)]
struct Failures {
    header: bool,
    header_delay: Option<Duration>,
    header_ack_stall: Option<Duration>,
    exercises: HashSet<ExerciseId>,
    sets: HashSet<ExerciseId>,
    template_touch: bool,
    previous_reads: bool,
    meal_writes: bool,
}

/// In-memory storage whose writes can be made to fail on demand.
///
/// Successful calls are delegated to a [`MemoryBackend`], so data written
/// through the mock can be read back.
#[derive(Default)]
pub struct MockWorkoutStorage {
    inner: MemoryBackend,
    failures: Mutex<Failures>,
    calls: Mutex<Vec<StorageCall>>,
}

impl MockWorkoutStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend holding everything that was written successfully
    pub fn backend(&self) -> &MemoryBackend {
        &self.inner
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<StorageCall> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Number of workout header writes attempted
    pub fn header_attempts(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, StorageCall::InsertWorkout(_)))
            .count()
    }

    pub fn fail_header(&self, fail: bool) {
        lock(&self.failures).header = fail;
    }

    /// Hold every workout header write for `delay` before completing it
    pub fn delay_header(&self, delay: Duration) {
        lock(&self.failures).header_delay = Some(delay);
    }

    /// Store the next workout header, then hold the call for `delay`
    /// before acknowledging it. Applies to one call only.
    pub fn stall_header_ack(&self, delay: Duration) {
        lock(&self.failures).header_ack_stall = Some(delay);
    }

    /// Fail the exercise header write for this exercise
    pub fn fail_exercise(&self, exercise_id: &ExerciseId) {
        lock(&self.failures).exercises.insert(exercise_id.clone());
    }

    /// Fail the set batch write for this exercise
    pub fn fail_sets(&self, exercise_id: &ExerciseId) {
        lock(&self.failures).sets.insert(exercise_id.clone());
    }

    pub fn fail_template_touch(&self, fail: bool) {
        lock(&self.failures).template_touch = fail;
    }

    pub fn fail_previous_reads(&self, fail: bool) {
        lock(&self.failures).previous_reads = fail;
    }

    pub fn fail_meal_writes(&self, fail: bool) {
        lock(&self.failures).meal_writes = fail;
    }

    fn record(&self, call: StorageCall) {
        lock(&self.calls).push(call);
    }

    fn injected(what: &str) -> StorageError {
        StorageError::unavailable(format!("injected {what} failure"))
    }
}

#[async_trait]
impl WorkoutStorage for MockWorkoutStorage {
    async fn insert_workout(&self, record: &WorkoutRecord) -> StorageResult<WorkoutId> {
        self.record(StorageCall::InsertWorkout(record.id.clone()));
        let (fail, delay) = {
            let failures = lock(&self.failures);
            (failures.header, failures.header_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(Self::injected("workout header"));
        }
        let id = self.inner.insert_workout(record).await?;
        let stall = lock(&self.failures).header_ack_stall.take();
        if let Some(stall) = stall {
            tokio::time::sleep(stall).await;
        }
        Ok(id)
    }

    async fn insert_exercise(&self, record: &ExerciseRecord) -> StorageResult<()> {
        self.record(StorageCall::InsertExercise(record.id.clone()));
        if lock(&self.failures).exercises.contains(&record.id) {
            return Err(Self::injected("exercise header"));
        }
        self.inner.insert_exercise(record).await
    }

    async fn insert_sets(&self, records: &[SetRecord]) -> StorageResult<()> {
        let exercise_id = records
            .first()
            .map(|s| s.exercise_id.clone())
            .unwrap_or_default();
        self.record(StorageCall::InsertSets {
            exercise_id: exercise_id.clone(),
            count: records.len(),
        });
        if lock(&self.failures).sets.contains(&exercise_id) {
            return Err(Self::injected("set batch"));
        }
        self.inner.insert_sets(records).await
    }

    async fn touch_template(&self, id: &TemplateId, used_at: DateTime<Utc>) -> StorageResult<()> {
        self.record(StorageCall::TouchTemplate(id.clone()));
        if lock(&self.failures).template_touch {
            return Err(Self::injected("template touch"));
        }
        self.inner.touch_template(id, used_at).await
    }

    async fn previous_performance(
        &self,
        exercise: &CatalogExerciseId,
        user: &UserId,
    ) -> StorageResult<Option<PreviousPerformance>> {
        self.record(StorageCall::PreviousPerformance(exercise.clone()));
        if lock(&self.failures).previous_reads {
            return Err(Self::injected("previous performance read"));
        }
        self.inner.previous_performance(exercise, user).await
    }

    async fn save_template(&self, template: &WorkoutTemplate) -> StorageResult<()> {
        self.inner.save_template(template).await
    }

    async fn load_template(&self, id: &TemplateId) -> StorageResult<Option<WorkoutTemplate>> {
        self.inner.load_template(id).await
    }

    async fn list_workouts(&self, user: &UserId) -> StorageResult<Vec<WorkoutSummary>> {
        self.inner.list_workouts(user).await
    }

    async fn load_workout_exercises(
        &self,
        workout: &WorkoutId,
    ) -> StorageResult<Vec<(ExerciseRecord, Vec<SetRecord>)>> {
        self.inner.load_workout_exercises(workout).await
    }
}

#[async_trait]
impl MealStorage for MockWorkoutStorage {
    async fn insert_meal(&self, meal: &MealEntry) -> StorageResult<()> {
        self.record(StorageCall::InsertMeal(meal.id.clone()));
        if lock(&self.failures).meal_writes {
            return Err(Self::injected("meal write"));
        }
        self.inner.insert_meal(meal).await
    }

    async fn delete_meal(&self, id: &MealId) -> StorageResult<()> {
        self.record(StorageCall::DeleteMeal(id.clone()));
        if lock(&self.failures).meal_writes {
            return Err(Self::injected("meal delete"));
        }
        self.inner.delete_meal(id).await
    }

    async fn list_meals(&self, user: &UserId) -> StorageResult<Vec<MealEntry>> {
        self.inner.list_meals(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout() -> WorkoutRecord {
        let now = Utc::now();
        WorkoutRecord {
            id: WorkoutId::new(),
            user_id: UserId::new(),
            name: "Test".to_string(),
            template_id: None,
            started_at: now,
            finished_at: now,
            duration_seconds: 0,
            total_volume: 0.0,
        }
    }

    #[tokio::test]
    async fn test_successful_calls_reach_backend() {
        let mock = MockWorkoutStorage::new();
        let record = workout();
        mock.insert_workout(&record).await.unwrap();

        assert_eq!(mock.backend().workout_count().await, 1);
        assert_eq!(mock.calls(), vec![StorageCall::InsertWorkout(record.id)]);
    }

    #[tokio::test]
    async fn test_injected_header_failure_is_logged() {
        let mock = MockWorkoutStorage::new();
        mock.fail_header(true);

        let err = mock.insert_workout(&workout()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(mock.header_attempts(), 1);
        assert_eq!(mock.backend().workout_count().await, 0);
    }
}
