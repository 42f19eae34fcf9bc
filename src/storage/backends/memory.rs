//! In-memory storage backend for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::latest_performance;
use crate::nutrition::MealEntry;
use crate::storage::{
    error::{StorageError, StorageResult},
    traits::{MealStorage, WorkoutStorage},
    types::{ExerciseRecord, SetRecord, WorkoutRecord, WorkoutSummary},
};
use crate::types::{
    CatalogExerciseId, MealId, PreviousPerformance, TemplateId, UserId, WorkoutId,
    WorkoutTemplate,
};

/// In-memory storage backend
#[derive(Default)]
pub struct MemoryBackend {
    workouts: Arc<RwLock<HashMap<WorkoutId, WorkoutRecord>>>,
    exercises: Arc<RwLock<Vec<ExerciseRecord>>>,
    sets: Arc<RwLock<Vec<SetRecord>>>,
    templates: Arc<RwLock<HashMap<TemplateId, WorkoutTemplate>>>,
    meals: Arc<RwLock<Vec<MealEntry>>>,
}

impl MemoryBackend {
    /// Create an empty memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed workout headers
    pub async fn workout_count(&self) -> usize {
        self.workouts.read().await.len()
    }
}

#[async_trait]
impl WorkoutStorage for MemoryBackend {
    async fn insert_workout(&self, record: &WorkoutRecord) -> StorageResult<WorkoutId> {
        let mut workouts = self.workouts.write().await;
        if workouts.contains_key(&record.id) {
            return Err(StorageError::duplicate("Workout", &record.id));
        }
        workouts.insert(record.id.clone(), record.clone());
        Ok(record.id.clone())
    }

    async fn insert_exercise(&self, record: &ExerciseRecord) -> StorageResult<()> {
        if !self.workouts.read().await.contains_key(&record.workout_id) {
            return Err(StorageError::missing("Workout", &record.workout_id));
        }

        let mut exercises = self.exercises.write().await;
        if exercises.iter().any(|e| e.id == record.id) {
            return Err(StorageError::duplicate("Exercise", &record.id));
        }
        exercises.push(record.clone());
        Ok(())
    }

    async fn insert_sets(&self, records: &[SetRecord]) -> StorageResult<()> {
        let exercises = self.exercises.read().await;
        if let Some(orphan) = records
            .iter()
            .find(|s| !exercises.iter().any(|e| e.id == s.exercise_id))
        {
            return Err(StorageError::missing("Exercise", &orphan.exercise_id));
        }
        self.sets.write().await.extend_from_slice(records);
        Ok(())
    }

    async fn touch_template(&self, id: &TemplateId, used_at: DateTime<Utc>) -> StorageResult<()> {
        let mut templates = self.templates.write().await;
        let template = templates
            .get_mut(id)
            .ok_or_else(|| StorageError::missing("Template", id))?;
        template.last_used_at = Some(used_at);
        Ok(())
    }

    async fn previous_performance(
        &self,
        exercise: &CatalogExerciseId,
        user: &UserId,
    ) -> StorageResult<Option<PreviousPerformance>> {
        let workouts = self.workouts.read().await;
        let exercises = self.exercises.read().await;
        let sets = self.sets.read().await;
        Ok(latest_performance(
            workouts.values(),
            &exercises,
            &sets,
            exercise,
            user,
        ))
    }

    async fn save_template(&self, template: &WorkoutTemplate) -> StorageResult<()> {
        self.templates
            .write()
            .await
            .insert(template.id.clone(), template.clone());
        Ok(())
    }

    async fn load_template(&self, id: &TemplateId) -> StorageResult<Option<WorkoutTemplate>> {
        Ok(self.templates.read().await.get(id).cloned())
    }

    async fn list_workouts(&self, user: &UserId) -> StorageResult<Vec<WorkoutSummary>> {
        let workouts = self.workouts.read().await;
        let exercises = self.exercises.read().await;
        let sets = self.sets.read().await;

        let mut summaries: Vec<WorkoutSummary> = workouts
            .values()
            .filter(|w| &w.user_id == user)
            .map(|w| {
                let exercise_ids: Vec<_> = exercises
                    .iter()
                    .filter(|e| e.workout_id == w.id)
                    .map(|e| &e.id)
                    .collect();
                WorkoutSummary {
                    record: w.clone(),
                    exercise_count: exercise_ids.len(),
                    set_count: sets
                        .iter()
                        .filter(|s| exercise_ids.contains(&&s.exercise_id))
                        .count(),
                }
            })
            .collect();
        summaries.sort_by(|a, b| b.record.finished_at.cmp(&a.record.finished_at));
        Ok(summaries)
    }

    async fn load_workout_exercises(
        &self,
        workout: &WorkoutId,
    ) -> StorageResult<Vec<(ExerciseRecord, Vec<SetRecord>)>> {
        let exercises = self.exercises.read().await;
        let sets = self.sets.read().await;

        let mut rows: Vec<(ExerciseRecord, Vec<SetRecord>)> = exercises
            .iter()
            .filter(|e| &e.workout_id == workout)
            .map(|e| {
                let mut owned: Vec<SetRecord> = sets
                    .iter()
                    .filter(|s| s.exercise_id == e.id)
                    .cloned()
                    .collect();
                owned.sort_by_key(|s| s.set_number);
                (e.clone(), owned)
            })
            .collect();
        rows.sort_by_key(|(e, _)| e.order);
        Ok(rows)
    }
}

#[async_trait]
impl MealStorage for MemoryBackend {
    async fn insert_meal(&self, meal: &MealEntry) -> StorageResult<()> {
        let mut meals = self.meals.write().await;
        if meals.iter().any(|m| m.id == meal.id) {
            return Err(StorageError::duplicate("Meal", &meal.id));
        }
        meals.push(meal.clone());
        Ok(())
    }

    async fn delete_meal(&self, id: &MealId) -> StorageResult<()> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| &m.id != id);
        if meals.len() == before {
            return Err(StorageError::missing("Meal", id));
        }
        Ok(())
    }

    async fn list_meals(&self, user: &UserId) -> StorageResult<Vec<MealEntry>> {
        let mut meals: Vec<MealEntry> = self
            .meals
            .read()
            .await
            .iter()
            .filter(|m| &m.user_id == user)
            .cloned()
            .collect();
        meals.sort_by(|a, b| a.logged_at.cmp(&b.logged_at));
        Ok(meals)
    }
}
