//! # ironlog
//!
//! Active workout session engine for a strength-training client.
//!
//! One live session at a time is built from a template or from scratch,
//! mutated set by set, timed by an elapsed clock and a rest countdown,
//! scored for personal records and finally committed to storage with
//! best-effort handling of partial failures.
//!
//! ## Modules
//!
//! - `session` - Session model, mutations, clocks, PR evaluation and the commit protocol
//! - `scoring` - Estimated one-rep-max, set volume and the plate calculator
//! - `storage` - Storage traits with in-memory and JSON file backends
//! - `nutrition` - Meal log with optimistic writes and macro totals
//! - `config` - Engine configuration (TOML file plus environment overrides)
//! - `tasks` - Detached background tasks with an explicit failure policy
//! - `app` - Binary setup: application config and logging
//! - `cli` - Command-line interface
//! - `testing` - Mock storage and fixtures
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod nutrition;
pub mod optimistic;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod tasks;
pub mod types;

pub mod testing;

mod sync;

pub use error::{Result, WorkoutError};
