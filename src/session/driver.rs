//! Background ticking of the session clocks

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::manager::SessionManager;
use super::timing::RestTick;
use crate::types::ExerciseId;

/// Notifications raised by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The rest countdown reached zero; sent once per countdown
    RestFinished { exercise_id: Option<ExerciseId> },
}

/// Ticks a [`SessionManager`] on a fixed period
pub struct TimerDriver;

impl TimerDriver {
    /// Spawn the tick loop.
    ///
    /// The loop ends when the returned receiver is dropped or the handle is
    /// aborted.
    pub fn spawn(
        manager: Arc<SessionManager>,
        period: Duration,
    ) -> (JoinHandle<()>, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let RestTick::Finished { exercise_id } = manager.tick() {
                    if tx.send(TimerEvent::RestFinished { exercise_id }).is_err() {
                        debug!("Timer event receiver dropped, stopping driver");
                        break;
                    }
                }
                if tx.is_closed() {
                    break;
                }
            }
        });

        (handle, rx)
    }
}
