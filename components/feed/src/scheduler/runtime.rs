use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    runtime::Handle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::{
    scheduler::{RepeatingTask, Scheduler, Task, TimerHandle},
    FeedError,
};

/// Scheduler backed by the tokio timer of the runtime it was created in.
pub struct TokioScheduler {
    handle: Handle,
    epoch: Instant,
}

impl TokioScheduler {
    pub fn new() -> Result<Self, FeedError> {
        let handle = Handle::try_current()?;
        Ok(Self { handle, epoch: Instant::now() })
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn schedule_after(&self, delay: Duration, task: Task) {
        log::trace!("one-shot timer in {delay:?}");
        self.handle.spawn(async move {
            time::sleep(delay).await;
            task();
        });
    }

    fn schedule_every(&self, period: Duration, mut task: RepeatingTask) -> TimerHandle {
        log::trace!("repeating timer every {period:?}");
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let join = self.handle.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // abort is only observed at the next await, the flag stops a tick that already woke
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                task();
            }
        });

        TimerHandle::new(cancelled, Some(join.abort_handle()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn requires_a_runtime() {
        let Err(FeedError::RuntimeUnavailable(_)) = TokioScheduler::new() else {
            panic!();
        };
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_fires_after_delay() {
        let scheduler = TokioScheduler::new().unwrap();
        let fired = Arc::new(AtomicBool::new(false));

        let f = fired.clone();
        scheduler.schedule_after(Duration::from_secs(1), Box::new(move || {
            f.store(true, Ordering::SeqCst);
        }));

        time::sleep(Duration::from_millis(500)).await;
        assert!(!fired.load(Ordering::SeqCst));

        time::sleep(Duration::from_millis(1000)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(scheduler.now() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_timer_stops_on_cancel() {
        let scheduler = TokioScheduler::new().unwrap();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        let handle = scheduler.schedule_every(Duration::from_secs(3), Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        time::sleep(Duration::from_millis(7500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        handle.cancel();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
