//! Session clocks
//!
//! Two independent logical clocks advanced by whole-second ticks: the
//! elapsed-session counter and the rest countdown. Neither reads the wall
//! clock; whoever drives `tick` decides what a second is.

use std::time::Duration;

use super::state::RestTimerState;
use crate::types::ExerciseId;

/// Count-up clock for the live session. No pause state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElapsedClock {
    seconds: u64,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.seconds = self.seconds.saturating_add(1);
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn reset(&mut self) {
        self.seconds = 0;
    }
}

/// What a rest-timer tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestTick {
    /// Timer not running
    Idle,
    /// Counting down
    Running { remaining_seconds: u32 },
    /// This tick reached zero; reported once per countdown
    Finished { exercise_id: Option<ExerciseId> },
}

/// Rest countdown. Starting again replaces the current countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestTimer {
    state: RestTimerState,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a countdown of `seconds`.
    ///
    /// A zero-length countdown is the same as `stop` and never finishes.
    pub fn start(&mut self, seconds: u32, exercise_id: Option<ExerciseId>) {
        if seconds == 0 {
            self.stop();
            return;
        }
        self.state = RestTimerState {
            running: true,
            remaining_seconds: seconds,
            total_seconds: seconds,
            exercise_id,
        };
    }

    /// Restart with `extra` seconds added to what is left. The total is
    /// reset to the new length, so the progress denominator moves.
    pub fn extend(&mut self, extra: u32) {
        let exercise_id = self.state.exercise_id.clone();
        self.start(self.state.remaining_seconds.saturating_add(extra), exercise_id);
    }

    /// Force the timer idle
    pub fn stop(&mut self) {
        self.state = RestTimerState::default();
    }

    pub fn tick(&mut self) -> RestTick {
        if !self.state.running {
            return RestTick::Idle;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            self.state.running = false;
            return RestTick::Finished {
                exercise_id: self.state.exercise_id.clone(),
            };
        }

        RestTick::Running {
            remaining_seconds: self.state.remaining_seconds,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn state(&self) -> &RestTimerState {
        &self.state
    }
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs < 60 {
        format!("{total_secs}s")
    } else if total_secs < 3600 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{mins}m {secs}s")
        } else {
            format!("{mins}m")
        }
    } else {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        if mins > 0 {
            format!("{hours}h {mins}m")
        } else {
            format!("{hours}h")
        }
    }
}

/// Stopwatch-style `H:MM:SS` / `M:SS` display of elapsed seconds
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}
