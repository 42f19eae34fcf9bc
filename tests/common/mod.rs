//! Common test utilities and helpers

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use ironlog::config::EngineConfig;
use ironlog::session::SessionManager;
use ironlog::storage::{Storage, StorageConfig, StorageFactory};
use ironlog::testing::MockWorkoutStorage;
use tempfile::TempDir;

/// Manager backed by a fresh file store under `temp`
pub async fn file_manager(temp: &TempDir) -> (Storage, SessionManager) {
    let config = EngineConfig {
        storage: StorageConfig::file(temp.path().join("store")),
        ..EngineConfig::default()
    };
    let storage = StorageFactory::from_config(&config.storage)
        .await
        .expect("file storage");
    let manager = SessionManager::new(storage.workouts(), config);
    (storage, manager)
}

/// Manager backed by the failure-injecting mock
pub fn mock_manager() -> (Arc<MockWorkoutStorage>, SessionManager) {
    let storage = Arc::new(MockWorkoutStorage::new());
    let manager = SessionManager::new(storage.clone(), EngineConfig::default());
    (storage, manager)
}

/// Write `content` to `name` inside `temp`
pub fn write_file(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, content).expect("write test file");
    path
}

pub const LEG_DAY: &str = r#"
name: Leg Day
user: alice
elapsed_seconds: 3000
exercises:
  - name: Back Squat
    sets:
      - { weight: 100, reps: 5 }
      - { weight: 100, reps: 5 }
  - name: Walking Lunge
    sets:
      - { weight: 20, reps: 12, completed: false }
"#;
