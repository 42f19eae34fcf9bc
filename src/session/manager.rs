//! Session manager: owner of the one live workout
//!
//! All state sits behind a single mutex that is never held across an
//! await. Storage is only touched by `start_from_template`,
//! `add_exercise_with_history` and `finish`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::commit::{commit, CommitReport};
use super::lifecycle::{build_empty, build_exercise, build_from_template};
use super::state::{RestTimerState, Session, SetPatch};
use super::timing::{ElapsedClock, RestTick, RestTimer};
use super::updates::{
    apply_add_exercise, apply_add_set, apply_complete_set, apply_exercise_notes,
    apply_remove_exercise, apply_remove_set, apply_set_patch, apply_skip_set, SetCompletion,
};
use crate::config::EngineConfig;
use crate::error::{Result, WorkoutError};
use crate::storage::WorkoutStorage;
use crate::sync::lock;
use crate::types::{
    CatalogExercise, CatalogExerciseId, ExerciseId, PreviousPerformance, SetId, UserId,
    WorkoutId, WorkoutTemplate,
};

#[derive(Debug, Default)]
struct EngineState {
    session: Option<Session>,
    elapsed: ElapsedClock,
    rest: RestTimer,
    is_finishing: bool,
}

impl EngineState {
    fn reset(&mut self) {
        self.session = None;
        self.elapsed.reset();
        self.rest.stop();
    }
}

/// Owns the live session, its clocks and the finish guard
pub struct SessionManager {
    storage: Arc<dyn WorkoutStorage>,
    config: EngineConfig,
    state: Mutex<EngineState>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(storage: Arc<dyn WorkoutStorage>, config: EngineConfig) -> Self {
        Self {
            storage,
            config,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn WorkoutStorage> {
        self.storage.clone()
    }

    // Lifecycle

    /// Start a session with no exercises
    pub fn start_empty(&self, name: impl Into<String>, user_id: UserId) -> Result<WorkoutId> {
        let session = build_empty(name, user_id);
        self.install(session)
    }

    /// Start a session seeded from `template`.
    ///
    /// Previous-performance snapshots are read first; a failed read leaves
    /// that exercise without history instead of failing the start.
    pub async fn start_from_template(
        &self,
        template: &WorkoutTemplate,
        user_id: UserId,
    ) -> Result<WorkoutId> {
        self.ensure_idle()?;

        let mut previous = HashMap::new();
        for planned in &template.exercises {
            let catalog_id = &planned.exercise.id;
            if previous.contains_key(catalog_id) {
                continue;
            }
            if let Some(snapshot) = self.load_previous(catalog_id, &user_id).await {
                previous.insert(catalog_id.clone(), snapshot);
            }
        }

        let session = build_from_template(template, user_id, &previous);
        self.install(session)
    }

    /// Drop the live session without writing anything.
    ///
    /// Rejected while a finish is in flight. Discarding with no live
    /// session is a no-op.
    pub fn discard(&self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.is_finishing {
            return Err(WorkoutError::FinishInProgress);
        }
        if let Some(session) = &state.session {
            info!("Discarding workout '{}' ({})", session.name, session.id);
        }
        state.reset();
        Ok(())
    }

    /// Commit the live session and clear it.
    ///
    /// A second call while one is in flight is rejected. If the workout
    /// header cannot be written the session stays live and the error is
    /// returned for the caller to retry.
    pub async fn finish(&self) -> Result<CommitReport> {
        let (session, duration_seconds) = {
            let mut state = lock(&self.state);
            if state.is_finishing {
                return Err(WorkoutError::FinishInProgress);
            }
            let session = state.session.clone().ok_or(WorkoutError::NoActiveSession)?;
            state.is_finishing = true;
            (session, state.elapsed.seconds())
        };

        info!(
            "Finishing workout '{}' ({}) after {}s",
            session.name, session.id, duration_seconds
        );

        let result = commit(
            self.storage.clone(),
            &session,
            duration_seconds,
            self.config.commit_timeout,
            self.config.write_timeout,
        )
        .await;

        let mut state = lock(&self.state);
        state.is_finishing = false;
        match result {
            Ok(report) => {
                state.reset();
                Ok(report)
            }
            Err(e) => {
                warn!("Finish aborted, workout {} is still live: {}", session.id, e);
                Err(e)
            }
        }
    }

    // Read accessors

    /// Snapshot of the live session
    pub fn session(&self) -> Option<Session> {
        lock(&self.state).session.clone()
    }

    pub fn is_live(&self) -> bool {
        lock(&self.state).session.is_some()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        lock(&self.state).elapsed.seconds()
    }

    pub fn rest_timer(&self) -> RestTimerState {
        lock(&self.state).rest.state().clone()
    }

    pub fn is_finishing(&self) -> bool {
        lock(&self.state).is_finishing
    }

    // Mutations

    /// Complete a set. The caller decides whether to start a rest timer.
    pub fn complete_set(&self, exercise_id: &ExerciseId, set_id: &SetId) -> Option<SetCompletion> {
        let completion = self
            .mutate("complete_set", |s| apply_complete_set(s, exercise_id, set_id))
            .flatten()?;
        if let Some(pr) = &completion.personal_record {
            info!(
                "New personal record on exercise {}: e1RM {:.2} (previous {:.2})",
                pr.exercise_id, pr.estimated_one_rep_max, pr.previous_estimate
            );
        }
        Some(completion)
    }

    pub fn skip_set(&self, exercise_id: &ExerciseId, set_id: &SetId) -> bool {
        self.mutate("skip_set", |s| apply_skip_set(s, exercise_id, set_id))
            .unwrap_or(false)
    }

    pub fn update_set(&self, exercise_id: &ExerciseId, set_id: &SetId, patch: SetPatch) -> bool {
        self.mutate("update_set", |s| apply_set_patch(s, exercise_id, set_id, patch))
            .unwrap_or(false)
    }

    pub fn add_set(&self, exercise_id: &ExerciseId) -> Option<SetId> {
        self.mutate("add_set", |s| apply_add_set(s, exercise_id)).flatten()
    }

    pub fn remove_set(&self, exercise_id: &ExerciseId, set_id: &SetId) -> bool {
        self.mutate("remove_set", |s| apply_remove_set(s, exercise_id, set_id))
            .unwrap_or(false)
    }

    pub fn update_exercise_notes(
        &self,
        exercise_id: &ExerciseId,
        notes: impl Into<String>,
    ) -> bool {
        let notes = notes.into();
        self.mutate("update_exercise_notes", |s| apply_exercise_notes(s, exercise_id, notes))
            .unwrap_or(false)
    }

    pub fn remove_exercise(&self, exercise_id: &ExerciseId) -> bool {
        self.mutate("remove_exercise", |s| apply_remove_exercise(s, exercise_id))
            .unwrap_or(false)
    }

    /// Append an exercise with an already known history snapshot
    pub fn add_exercise(
        &self,
        exercise: CatalogExercise,
        previous: Option<PreviousPerformance>,
    ) -> Option<ExerciseId> {
        self.mutate("add_exercise", |s| {
            let built = build_exercise(exercise, previous, s.exercises.len());
            apply_add_exercise(s, built)
        })
    }

    /// Append an exercise, reading its history from storage first
    pub async fn add_exercise_with_history(&self, exercise: CatalogExercise) -> Option<ExerciseId> {
        let user_id = {
            let state = lock(&self.state);
            state.session.as_ref()?.user_id.clone()
        };
        let previous = self.load_previous(&exercise.id, &user_id).await;
        self.add_exercise(exercise, previous)
    }

    // Timers

    /// Start or replace the rest countdown
    pub fn start_rest_timer(&self, seconds: u32, exercise_id: Option<ExerciseId>) {
        let mut state = lock(&self.state);
        if state.session.is_none() {
            debug!("Ignoring rest timer start without a live session");
            return;
        }
        debug!("Rest timer started: {}s", seconds);
        state.rest.start(seconds, exercise_id);
    }

    /// Start the rest countdown with the configured default length
    pub fn start_default_rest(&self, exercise_id: Option<ExerciseId>) {
        self.start_rest_timer(self.config.default_rest_seconds, exercise_id);
    }

    /// Add the configured extension to whatever is left
    pub fn extend_rest_timer(&self) {
        let mut state = lock(&self.state);
        if state.session.is_none() {
            return;
        }
        state.rest.extend(self.config.rest_extension_seconds);
    }

    pub fn stop_rest_timer(&self) {
        lock(&self.state).rest.stop();
    }

    /// Advance both clocks by one second.
    ///
    /// Nothing moves while no session is live.
    pub fn tick(&self) -> RestTick {
        let mut state = lock(&self.state);
        if state.session.is_none() {
            return RestTick::Idle;
        }
        state.elapsed.tick();
        let rest = state.rest.tick();
        if let RestTick::Finished { exercise_id } = &rest {
            debug!("Rest timer finished for {:?}", exercise_id);
        }
        rest
    }

    // Internals

    fn ensure_idle(&self) -> Result<()> {
        if lock(&self.state).session.is_some() {
            return Err(WorkoutError::SessionAlreadyActive);
        }
        Ok(())
    }

    fn install(&self, session: Session) -> Result<WorkoutId> {
        let mut state = lock(&self.state);
        if state.session.is_some() {
            return Err(WorkoutError::SessionAlreadyActive);
        }
        let id = session.id.clone();
        info!(
            "Started workout '{}' ({}) with {} exercises",
            session.name,
            id,
            session.exercises.len()
        );
        state.reset();
        state.session = Some(session);
        Ok(id)
    }

    async fn load_previous(
        &self,
        exercise: &CatalogExerciseId,
        user: &UserId,
    ) -> Option<PreviousPerformance> {
        match self.storage.previous_performance(exercise, user).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to load previous performance for {}: {}", exercise, e);
                None
            }
        }
    }

    fn mutate<T>(&self, op: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut state = lock(&self.state);
        if state.is_finishing {
            debug!("Ignoring {} while finishing", op);
            return None;
        }
        match state.session.as_mut() {
            Some(session) => {
                debug!("Applying {} to workout {}", op, session.id);
                Some(f(session))
            }
            None => {
                debug!("Ignoring {} without a live session", op);
                None
            }
        }
    }
}
