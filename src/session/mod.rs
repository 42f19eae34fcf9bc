//! Active workout session engine
//!
//! One [`SessionManager`] owns at most one live [`Session`]. A session is
//! built from a template or from scratch, mutated set by set while the user
//! trains, timed by two whole-second clocks, and finally either discarded or
//! committed to storage by `finish`.
//!
//! The pieces are split the same way the manager uses them:
//!
//! - `state`: the session data model
//! - `lifecycle`: building sessions and exercises
//! - `updates`: pure mutations over a session
//! - `records`: personal-record evaluation
//! - `timing`: elapsed clock and rest countdown
//! - `commit`: the finish protocol and its report
//! - `driver`: tokio task that ticks the clocks

pub mod commit;
pub mod driver;
pub mod lifecycle;
pub mod manager;
pub mod records;
pub mod state;
pub mod timing;
pub mod updates;


pub use commit::{CommitReport, ExerciseCommitStatus, ExerciseOutcome};
pub use driver::{TimerDriver, TimerEvent};
pub use manager::SessionManager;
pub use state::{
    PrEvent, RestTimerState, Session, SessionExercise, SetPatch, SetStatus, WorkoutSet,
};
pub use timing::{format_clock, format_duration, RestTick};
pub use updates::SetCompletion;
