//! Storage failures

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded
    #[error("Corrupt record: {0}")]
    Serialization(String),

    /// The backend refused a write it understood
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// A referenced parent record is missing
    #[error("{kind} {id} does not exist")]
    Missing { kind: &'static str, id: String },

    /// A record with the same id was already written
    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage call exceeded {0:?}")]
    Timeout(Duration),
}

impl StorageError {
    pub fn serialization<E: fmt::Display>(err: E) -> Self {
        Self::Serialization(err.to_string())
    }

    pub fn rejected<E: fmt::Display>(reason: E) -> Self {
        Self::Rejected(reason.to_string())
    }

    pub fn missing(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::Missing {
            kind,
            id: id.to_string(),
        }
    }

    pub fn duplicate(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::Duplicate {
            kind,
            id: id.to_string(),
        }
    }

    pub fn unavailable<E: fmt::Display>(reason: E) -> Self {
        Self::Unavailable(reason.to_string())
    }

    /// Transient failures a later attempt may get past
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Unavailable(_) | Self::Timeout(_)
        )
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_failures_are_retryable() {
        assert!(StorageError::unavailable("offline").is_retryable());
        assert!(StorageError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!StorageError::rejected("bad batch").is_retryable());
        assert!(!StorageError::duplicate("Workout", "w1").is_retryable());
    }

    #[test]
    fn test_messages_name_the_record() {
        assert_eq!(
            StorageError::missing("Template", "t-9").to_string(),
            "Template t-9 does not exist"
        );
        assert_eq!(
            StorageError::duplicate("Meal", "m-1").to_string(),
            "Meal m-1 already exists"
        );
        assert!(StorageError::missing("Workout", "w").is_missing());
        assert!(!StorageError::missing("Workout", "w").is_duplicate());
    }

    #[test]
    fn test_serde_error_converts() {
        let err: StorageError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
