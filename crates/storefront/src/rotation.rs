//! Cancellable periodic rotation through a fixed list.
//!
//! The home page cycles its testimonials on a timer. [`Rotation`] owns the
//! background task that advances the position; cancelling or dropping the
//! handle aborts the task, so the recurring tick never outlives the view
//! that displays it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Handle to a running rotation.
#[derive(Debug)]
pub struct Rotation {
    position: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl Rotation {
    /// Start advancing through `len` positions, one step per `period`.
    ///
    /// The first step happens one full `period` after start. Must be called
    /// from within a Tokio runtime.
    #[must_use]
    pub fn start(period: Duration, len: usize) -> Self {
        let position = Arc::new(AtomicUsize::new(0));
        let len = len.max(1);

        let task = tokio::spawn({
            let position = Arc::clone(&position);
            async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    let next = (position.load(Ordering::Relaxed) + 1) % len;
                    position.store(next, Ordering::Relaxed);
                    tracing::trace!(position = next, "Rotation advanced");
                }
            }
        });

        Self { position, task }
    }

    /// Current position, in `0..len`.
    #[must_use]
    pub fn current(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    /// Stop the rotation. The position freezes where it is.
    pub fn cancel(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Rotation {
    fn drop(&mut self) {
        self.task.abort();
    }
}
