//! Identifiers and read-only domain data shared by the engine and storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, globally unique identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing identifier
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a workout (live session or committed record)
    WorkoutId
);
define_id!(
    /// Identity of an exercise instance inside one workout
    ExerciseId
);
define_id!(
    /// Identity of a set
    SetId
);
define_id!(
    /// Identity of a PR event
    PrEventId
);
define_id!(UserId);
define_id!(TemplateId);
define_id!(
    /// Identity of an exercise in the shared catalog
    CatalogExerciseId
);
define_id!(MealId);

/// Classification of a set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetTag {
    WarmUp,
    Working,
    Failure,
    Drop,
    #[default]
    Normal,
}

impl SetTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetTag::WarmUp => "warm_up",
            SetTag::Working => "working",
            SetTag::Failure => "failure",
            SetTag::Drop => "drop",
            SetTag::Normal => "normal",
        }
    }
}

/// Catalog lookup data for an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogExercise {
    pub id: CatalogExerciseId,
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
}

impl CatalogExercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CatalogExerciseId::new(),
            name: name.into(),
            muscle_groups: Vec::new(),
        }
    }

    pub fn with_muscle_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.muscle_groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

/// One planned set in a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSet {
    #[serde(default)]
    pub tag: Option<SetTag>,
    #[serde(default)]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub target_reps: Option<i32>,
}

/// One planned exercise in a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub exercise: CatalogExercise,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sets: Vec<TemplateSet>,
}

/// Reusable plan a session can be seeded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: TemplateId,
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// One set from the most recent earlier performance of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousSet {
    pub weight: Option<f64>,
    pub reps: Option<i32>,
}

/// Snapshot of how an exercise went last time; never mutated by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousPerformance {
    pub workout_id: WorkoutId,
    pub performed_at: DateTime<Utc>,
    pub sets: Vec<PreviousSet>,
}

impl PreviousPerformance {
    /// Set at the same position, if the previous session had that many
    pub fn set_at(&self, index: usize) -> Option<&PreviousSet> {
        self.sets.get(index)
    }
}
