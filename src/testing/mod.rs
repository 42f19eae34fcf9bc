//! Testing utilities and fixtures
//!
//! Shared by unit tests, integration tests under `tests/` and benches.

pub mod fixtures;
pub mod mocks;

pub use mocks::{MockWorkoutStorage, StorageCall};
