//! Optimistic in-memory updates with rollback
//!
//! A change is applied to local state first so the caller sees it
//! immediately, then the durable write runs. If the write fails the
//! precomputed inverse is applied and the write error is returned.

use std::future::Future;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::sync::lock;

/// A change paired with its inverse
pub struct OptimisticUpdate<S> {
    label: &'static str,
    apply: Box<dyn FnOnce(&mut S) + Send>,
    revert: Box<dyn FnOnce(&mut S) + Send>,
}

impl<S> OptimisticUpdate<S> {
    pub fn new<A, R>(label: &'static str, apply: A, revert: R) -> Self
    where
        A: FnOnce(&mut S) + Send + 'static,
        R: FnOnce(&mut S) + Send + 'static,
    {
        Self {
            label,
            apply: Box::new(apply),
            revert: Box::new(revert),
        }
    }
}

/// Apply `update` to `state`, await `write`, and revert on failure.
///
/// The lock is never held across the write.
pub async fn apply_optimistic<S, T, E, F>(
    state: &Mutex<S>,
    update: OptimisticUpdate<S>,
    write: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let OptimisticUpdate {
        label,
        apply,
        revert,
    } = update;

    apply(&mut *lock(state));
    debug!("Applied optimistic update: {}", label);

    match write.await {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Durable write for {} failed, rolling back: {}", label, e);
            revert(&mut *lock(state));
            Err(e)
        }
    }
}
