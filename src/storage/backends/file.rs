//! File-based storage backend implementation
//!
//! Layout under the base directory:
//!
//! ```text
//! workouts/<workout>.json
//! exercises/<workout>/<exercise>.json
//! sets/<exercise>.json
//! templates/<template>.json
//! meals/<user>/<meal>.json
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::latest_performance;
use crate::nutrition::MealEntry;
use crate::storage::{
    error::{StorageError, StorageResult},
    traits::{MealStorage, WorkoutStorage},
    types::{ExerciseRecord, SetRecord, WorkoutRecord, WorkoutSummary},
};
use crate::types::{
    CatalogExerciseId, ExerciseId, MealId, PreviousPerformance, TemplateId, UserId, WorkoutId,
    WorkoutTemplate,
};

/// File-based storage backend
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend rooted at `base_dir`
    pub async fn new(base_dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(base_dir).await?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn workout_path(&self, id: &WorkoutId) -> PathBuf {
        self.base_dir.join("workouts").join(format!("{id}.json"))
    }

    fn exercise_dir(&self, workout: &WorkoutId) -> PathBuf {
        self.base_dir.join("exercises").join(workout.as_str())
    }

    fn sets_path(&self, exercise: &ExerciseId) -> PathBuf {
        self.base_dir.join("sets").join(format!("{exercise}.json"))
    }

    fn template_path(&self, id: &TemplateId) -> PathBuf {
        self.base_dir.join("templates").join(format!("{id}.json"))
    }

    fn meal_dir(&self, user: &UserId) -> PathBuf {
        self.base_dir.join("meals").join(user.as_str())
    }

    /// Read JSON file
    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<T> {
        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(StorageError::serialization)
    }

    /// Read JSON file, treating a missing file as `None`
    async fn read_json_opt<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<Option<T>> {
        if !fs::try_exists(path).await? {
            return Ok(None);
        }
        self.read_json(path).await.map(Some)
    }

    /// Write JSON file, creating parent directories
    async fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Read every `*.json` file in a directory; unreadable entries are skipped
    async fn read_dir_json<T: DeserializeOwned>(&self, dir: &Path) -> StorageResult<Vec<T>> {
        if !fs::try_exists(dir).await? {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match self.read_json(&path).await {
                    Ok(item) => items.push(item),
                    Err(e) => warn!("Skipping unreadable file {}: {}", path.display(), e),
                }
            }
        }
        Ok(items)
    }

    async fn user_workouts(&self, user: &UserId) -> StorageResult<Vec<WorkoutRecord>> {
        let workouts: Vec<WorkoutRecord> =
            self.read_dir_json(&self.base_dir.join("workouts")).await?;
        Ok(workouts
            .into_iter()
            .filter(|w| &w.user_id == user)
            .collect())
    }

    async fn exercise_sets(&self, exercise: &ExerciseId) -> StorageResult<Vec<SetRecord>> {
        Ok(self
            .read_json_opt(&self.sets_path(exercise))
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl WorkoutStorage for FileBackend {
    async fn insert_workout(&self, record: &WorkoutRecord) -> StorageResult<WorkoutId> {
        let path = self.workout_path(&record.id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::duplicate("Workout", &record.id));
        }
        self.write_json(&path, record).await?;
        Ok(record.id.clone())
    }

    async fn insert_exercise(&self, record: &ExerciseRecord) -> StorageResult<()> {
        if !fs::try_exists(self.workout_path(&record.workout_id)).await? {
            return Err(StorageError::missing("Workout", &record.workout_id));
        }
        let path = self
            .exercise_dir(&record.workout_id)
            .join(format!("{}.json", record.id));
        self.write_json(&path, record).await
    }

    async fn insert_sets(&self, records: &[SetRecord]) -> StorageResult<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        if records.iter().any(|s| s.exercise_id != first.exercise_id) {
            return Err(StorageError::rejected(
                "Set batch spans more than one exercise",
            ));
        }

        let mut existing = self.exercise_sets(&first.exercise_id).await?;
        existing.extend_from_slice(records);
        self.write_json(&self.sets_path(&first.exercise_id), &existing)
            .await
    }

    async fn touch_template(&self, id: &TemplateId, used_at: DateTime<Utc>) -> StorageResult<()> {
        let path = self.template_path(id);
        let mut template: WorkoutTemplate = self
            .read_json_opt(&path)
            .await?
            .ok_or_else(|| StorageError::missing("Template", id))?;
        template.last_used_at = Some(used_at);
        self.write_json(&path, &template).await
    }

    async fn previous_performance(
        &self,
        exercise: &CatalogExerciseId,
        user: &UserId,
    ) -> StorageResult<Option<PreviousPerformance>> {
        let mut workouts = self.user_workouts(user).await?;
        workouts.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));

        for workout in workouts {
            let exercises: Vec<ExerciseRecord> =
                self.read_dir_json(&self.exercise_dir(&workout.id)).await?;
            let Some(entry) = exercises
                .iter()
                .filter(|e| &e.catalog_exercise_id == exercise)
                .min_by_key(|e| e.order)
            else {
                continue;
            };
            let sets = self.exercise_sets(&entry.id).await?;
            return Ok(latest_performance(
                std::iter::once(&workout),
                &exercises,
                &sets,
                exercise,
                user,
            ));
        }
        Ok(None)
    }

    async fn save_template(&self, template: &WorkoutTemplate) -> StorageResult<()> {
        self.write_json(&self.template_path(&template.id), template)
            .await
    }

    async fn load_template(&self, id: &TemplateId) -> StorageResult<Option<WorkoutTemplate>> {
        self.read_json_opt(&self.template_path(id)).await
    }

    async fn list_workouts(&self, user: &UserId) -> StorageResult<Vec<WorkoutSummary>> {
        let mut summaries = Vec::new();
        for record in self.user_workouts(user).await? {
            let exercises: Vec<ExerciseRecord> =
                self.read_dir_json(&self.exercise_dir(&record.id)).await?;
            let mut set_count = 0;
            for exercise in &exercises {
                set_count += self.exercise_sets(&exercise.id).await?.len();
            }
            summaries.push(WorkoutSummary {
                record,
                exercise_count: exercises.len(),
                set_count,
            });
        }
        summaries.sort_by(|a, b| b.record.finished_at.cmp(&a.record.finished_at));
        Ok(summaries)
    }

    async fn load_workout_exercises(
        &self,
        workout: &WorkoutId,
    ) -> StorageResult<Vec<(ExerciseRecord, Vec<SetRecord>)>> {
        let mut exercises: Vec<ExerciseRecord> =
            self.read_dir_json(&self.exercise_dir(workout)).await?;
        exercises.sort_by_key(|e| e.order);

        let mut rows = Vec::with_capacity(exercises.len());
        for exercise in exercises {
            let mut sets = self.exercise_sets(&exercise.id).await?;
            sets.sort_by_key(|s| s.set_number);
            rows.push((exercise, sets));
        }
        Ok(rows)
    }
}

#[async_trait]
impl MealStorage for FileBackend {
    async fn insert_meal(&self, meal: &MealEntry) -> StorageResult<()> {
        let path = self.meal_dir(&meal.user_id).join(format!("{}.json", meal.id));
        if fs::try_exists(&path).await? {
            return Err(StorageError::duplicate("Meal", &meal.id));
        }
        self.write_json(&path, meal).await
    }

    async fn delete_meal(&self, id: &MealId) -> StorageResult<()> {
        let meals_root = self.base_dir.join("meals");
        if fs::try_exists(&meals_root).await? {
            let mut users = fs::read_dir(&meals_root).await?;
            while let Some(user_dir) = users.next_entry().await? {
                let path = user_dir.path().join(format!("{id}.json"));
                if fs::try_exists(&path).await? {
                    fs::remove_file(&path).await?;
                    return Ok(());
                }
            }
        }
        Err(StorageError::missing("Meal", id))
    }

    async fn list_meals(&self, user: &UserId) -> StorageResult<Vec<MealEntry>> {
        let mut meals: Vec<MealEntry> = self.read_dir_json(&self.meal_dir(user)).await?;
        meals.sort_by(|a, b| a.logged_at.cmp(&b.logged_at));
        Ok(meals)
    }
}
