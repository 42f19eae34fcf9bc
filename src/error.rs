use std::time::Duration;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum WorkoutError {
    #[error("A workout session is already active")]
    SessionAlreadyActive,

    #[error("No active workout session")]
    NoActiveSession,

    #[error("Finish is already in progress")]
    FinishInProgress,

    #[error("Failed to save workout: {0}")]
    HeaderWrite(#[source] StorageError),

    #[error("Saving the workout timed out after {0:?}")]
    CommitTimeout(Duration),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkoutError {
    /// Whether the user can retry the failed operation as-is.
    ///
    /// Only a failed or timed-out workout header write is surfaced this way;
    /// the live session is still intact in both cases.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::HeaderWrite(_) | Self::CommitTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, WorkoutError>;
