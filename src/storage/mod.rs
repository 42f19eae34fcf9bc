//! Storage abstraction layer
//!
//! The session engine writes committed workouts through [`WorkoutStorage`]
//! and the meal log through [`MealStorage`]. Two backends ship with the
//! crate: an in-memory one for tests and short-lived replays, and a JSON
//! file tree under a base directory.

pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod traits;
pub mod types;

pub use backends::{FileBackend, MemoryBackend};
pub use config::{BackendType, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use factory::{Storage, StorageFactory};
pub use traits::{MealStorage, WorkoutStorage};
pub use types::{ExerciseRecord, SetRecord, WorkoutRecord, WorkoutSummary};
