//! Motor game elapsed-time ticker.
//!
//! A [`MotorTimer`] is a tokio task that sends one
//! [`Completion::TimerTick`] per period, tagged with the generation of the
//! motor stage that started it. The task is aborted by [`MotorTimer::stop`]
//! and when the handle is dropped, so a timer can never outlive the stage
//! that owns it. Ticks already queued when the stage ends are discarded by
//! the session's generation check.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::session::{Completion, Generation};

/// A completion tagged with the generation that requested it.
pub type Tagged = (Generation, Completion);

/// Handle to a running motor timer.
#[derive(Debug)]
pub struct MotorTimer {
    generation: Generation,
    handle: JoinHandle<()>,
}

impl MotorTimer {
    /// Start ticking every `period`. The first tick arrives one full period
    /// after the start.
    pub fn start(generation: Generation, period: Duration, tx: mpsc::Sender<Tagged>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send((generation, Completion::TimerTick)).await.is_err() {
                    break;
                }
            }
        });
        debug!(%generation, period_ms = period.as_millis(), "motor timer started");
        Self { generation, handle }
    }

    /// Generation the ticks are tagged with.
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Stop ticking.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for MotorTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(generation = %self.generation, "motor timer stopped");
    }
}
