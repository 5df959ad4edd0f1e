use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use crate::scheduler::{RepeatingTask, Scheduler, Task, TimerHandle};

enum Timer {
    Once(Task),
    Every { interval: Duration, task: RepeatingTask, cancelled: Arc<AtomicBool> },
}

// timers are keyed by (due time, scheduling sequence) so equal due times fire in the order
// they were scheduled
#[derive(Default)]
struct Timeline {
    now: Duration,
    seq: u64,
    timers: BTreeMap<(Duration, u64), Timer>,
}

impl Timeline {
    fn push(&mut self, due: Duration, timer: Timer) {
        self.timers.insert((due, self.seq), timer);
        self.seq += 1;
    }

    fn pop_due(&mut self, until: Duration) -> Option<(Duration, Timer)> {
        let (&(due, _), _) = self.timers.first_key_value()?;
        if due > until {
            return None;
        }
        self.timers.pop_first().map(|((due, _), timer)| (due, timer))
    }
}

/// Deterministic clock that only moves when [`VirtualScheduler::advance`] is called.
#[derive(Default)]
pub struct VirtualScheduler {
    timeline: Mutex<Timeline>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Default::default()
    }

    fn timeline(&self) -> MutexGuard<'_, Timeline> {
        self.timeline.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the clock forward by `by`, firing every timer that falls due on the way.
    /// Timers scheduled by a firing task fire in the same call when they are due in time.
    pub fn advance(&self, by: Duration) {
        let until = self.timeline().now + by;

        loop {
            // the lock is released before running a task, tasks schedule new timers
            let Some((due, timer)) = self.timeline().pop_due(until) else {
                break;
            };
            self.timeline().now = due;

            match timer {
                Timer::Once(task) => task(),
                Timer::Every { interval, mut task, cancelled } => {
                    if cancelled.load(Ordering::SeqCst) {
                        continue;
                    }
                    task();
                    // the task may cancel its own timer
                    if !cancelled.load(Ordering::SeqCst) {
                        self.timeline().push(due + interval, Timer::Every {
                            interval,
                            task,
                            cancelled,
                        });
                    }
                },
            }
        }

        self.timeline().now = until;
    }

    /// Number of timers still waiting to fire. Cancelled repeating timers count until
    /// their next due time is reached.
    pub fn pending(&self) -> usize {
        self.timeline().timers.len()
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Duration {
        self.timeline().now
    }

    fn schedule_after(&self, delay: Duration, task: Task) {
        let mut timeline = self.timeline();
        let due = timeline.now + delay;
        timeline.push(due, Timer::Once(task));
    }

    fn schedule_every(&self, interval: Duration, task: RepeatingTask) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut timeline = self.timeline();
        let due = timeline.now + interval;
        timeline.push(due, Timer::Every { interval, task, cancelled: cancelled.clone() });
        TimerHandle::new(cancelled, None)
    }
}
