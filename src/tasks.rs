//! Named background tasks whose failures never reach the caller

use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What to do when a detached task fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log at warn and move on
    Ignore,
}

/// Handle to a task spawned with [`spawn_detached`].
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct DetachedTask {
    name: String,
    policy: FailurePolicy,
    handle: JoinHandle<bool>,
}

impl DetachedTask {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task and report whether it succeeded
    pub async fn join(self) -> bool {
        match self.handle.await {
            Ok(succeeded) => succeeded,
            Err(e) => {
                warn!("Detached task '{}' panicked or was cancelled: {}", self.name, e);
                false
            }
        }
    }
}

/// Spawn `fut` on the runtime without tying its outcome to the caller.
pub fn spawn_detached<F, E>(
    name: impl Into<String>,
    policy: FailurePolicy,
    fut: F,
) -> DetachedTask
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let name = name.into();
    let task_name = name.clone();
    let handle = tokio::spawn(async move {
        match fut.await {
            Ok(()) => {
                debug!("Detached task '{}' completed", task_name);
                true
            }
            Err(e) => {
                match policy {
                    FailurePolicy::Ignore => {
                        warn!("Detached task '{}' failed (ignored): {}", task_name, e)
                    }
                }
                false
            }
        }
    });

    DetachedTask {
        name,
        policy,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_is_reported() {
        let task = spawn_detached("ok", FailurePolicy::Ignore, async {
            Ok::<(), String>(())
        });
        assert_eq!(task.name(), "ok");
        assert!(task.join().await);
    }

    #[tokio::test]
    async fn test_failure_is_absorbed() {
        let task = spawn_detached("boom", FailurePolicy::Ignore, async {
            Err::<(), _>("storage offline".to_string())
        });
        assert_eq!(task.policy(), FailurePolicy::Ignore);
        assert!(!task.join().await);
    }

    #[tokio::test]
    async fn test_runs_without_join() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let task = spawn_detached("signal", FailurePolicy::Ignore, async move {
            tx.send(42).map_err(|_| "receiver gone")
        });
        drop(task);
        assert_eq!(rx.await.unwrap(), 42);
    }
}
