use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::task::AbortHandle;

mod runtime;
mod virtual_clock;

pub use runtime::TokioScheduler;
pub use virtual_clock::VirtualScheduler;

pub type Task = Box<dyn FnOnce() + Send + 'static>;
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Timer capability the simulator is driven by. Tasks are fire-and-forget: a one-shot task
/// can't be cancelled, a repeating one is stopped through its [`TimerHandle`].
pub trait Scheduler: Send + Sync + 'static {
    /// Elapsed time on this scheduler's clock.
    fn now(&self) -> Duration;

    fn schedule_after(&self, delay: Duration, task: Task);

    /// Runs `task` every `interval`, the first time one `interval` from now.
    fn schedule_every(&self, interval: Duration, task: RepeatingTask) -> TimerHandle;
}

impl<S: Scheduler> Scheduler for Arc<S> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn schedule_after(&self, delay: Duration, task: Task) {
        (**self).schedule_after(delay, task)
    }

    fn schedule_every(&self, interval: Duration, task: RepeatingTask) -> TimerHandle {
        (**self).schedule_every(interval, task)
    }
}

#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    pub(crate) fn new(cancelled: Arc<AtomicBool>, abort: Option<AbortHandle>) -> Self {
        Self { cancelled, abort }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
