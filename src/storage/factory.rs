//! Storage factory for creating storage instances

use std::sync::Arc;

use super::backends::{FileBackend, MemoryBackend};
use super::config::{BackendType, StorageConfig};
use super::error::StorageResult;
use super::traits::{MealStorage, WorkoutStorage};

/// Handles to every storage subsystem of one backend
#[derive(Clone)]
pub struct Storage {
    workouts: Arc<dyn WorkoutStorage>,
    meals: Arc<dyn MealStorage>,
}

impl Storage {
    /// Share one backend across all subsystems
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: WorkoutStorage + MealStorage + 'static,
    {
        Self {
            workouts: backend.clone(),
            meals: backend,
        }
    }

    /// Workout storage implementation
    pub fn workouts(&self) -> Arc<dyn WorkoutStorage> {
        Arc::clone(&self.workouts)
    }

    /// Meal storage implementation
    pub fn meals(&self) -> Arc<dyn MealStorage> {
        Arc::clone(&self.meals)
    }
}

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create storage from explicit configuration
    pub async fn from_config(config: &StorageConfig) -> StorageResult<Storage> {
        match config.backend {
            BackendType::File => {
                let backend = FileBackend::new(&config.base_dir).await?;
                Ok(Storage::from_backend(Arc::new(backend)))
            }
            BackendType::Memory => Ok(Storage::from_backend(Arc::new(MemoryBackend::new()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use tempfile::TempDir;

    #[test]
    fn test_memory_backend_from_config() {
        let storage =
            tokio_test::block_on(StorageFactory::from_config(&StorageConfig::memory())).unwrap();
        let workouts =
            tokio_test::block_on(storage.workouts().list_workouts(&UserId::new())).unwrap();
        assert!(workouts.is_empty());
    }

    #[tokio::test]
    async fn test_file_backend_creates_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("store");
        let storage = StorageFactory::from_config(&StorageConfig::file(&base))
            .await
            .unwrap();
        assert!(base.exists());
        assert!(storage
            .meals()
            .list_meals(&UserId::new())
            .await
            .unwrap()
            .is_empty());
    }
}
