//! Core trait definitions for the storage layer
//!
//! The engine only ever talks to these traits. Writes are single round
//! trips; ordering between them is the caller's responsibility.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StorageResult;
use super::types::{ExerciseRecord, SetRecord, WorkoutRecord, WorkoutSummary};
use crate::nutrition::MealEntry;
use crate::types::{
    CatalogExerciseId, MealId, PreviousPerformance, TemplateId, UserId, WorkoutId,
    WorkoutTemplate,
};

/// Durable storage for committed workouts and templates
#[async_trait]
pub trait WorkoutStorage: Send + Sync {
    /// Write a workout header
    async fn insert_workout(&self, record: &WorkoutRecord) -> StorageResult<WorkoutId>;

    /// Write one exercise header; its workout must already exist
    async fn insert_exercise(&self, record: &ExerciseRecord) -> StorageResult<()>;

    /// Write the completed sets of one exercise as a batch
    async fn insert_sets(&self, records: &[SetRecord]) -> StorageResult<()>;

    /// Update a template's last-used timestamp
    async fn touch_template(&self, id: &TemplateId, used_at: DateTime<Utc>) -> StorageResult<()>;

    /// Most recent committed performance of a catalog exercise by a user
    async fn previous_performance(
        &self,
        exercise: &CatalogExerciseId,
        user: &UserId,
    ) -> StorageResult<Option<PreviousPerformance>>;

    /// Save or replace a template
    async fn save_template(&self, template: &WorkoutTemplate) -> StorageResult<()>;

    /// Load a template by ID
    async fn load_template(&self, id: &TemplateId) -> StorageResult<Option<WorkoutTemplate>>;

    /// List a user's committed workouts, newest first
    async fn list_workouts(&self, user: &UserId) -> StorageResult<Vec<WorkoutSummary>>;

    /// Load the persisted exercises and their sets for one workout
    async fn load_workout_exercises(
        &self,
        workout: &WorkoutId,
    ) -> StorageResult<Vec<(ExerciseRecord, Vec<SetRecord>)>>;
}

/// Durable storage for logged meals
#[async_trait]
pub trait MealStorage: Send + Sync {
    /// Write a meal entry
    async fn insert_meal(&self, meal: &MealEntry) -> StorageResult<()>;

    /// Delete a meal entry
    async fn delete_meal(&self, id: &MealId) -> StorageResult<()>;

    /// List a user's meals, oldest first
    async fn list_meals(&self, user: &UserId) -> StorageResult<Vec<MealEntry>>;
}
