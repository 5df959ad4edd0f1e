use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    record::{TransactionRecord, TxId, TxStatus},
    scheduler::{Scheduler, TimerHandle},
    FeedConfig, FeedError,
};

mod generator;

use generator::RecordGenerator;

struct FeedState<R> {
    active: bool,
    // set by the first start(), later starts wait a full interval for their first record
    started: bool,
    ticker: Option<TimerHandle>,
    // newest first
    records: VecDeque<TransactionRecord>,
    generator: RecordGenerator<R>,
}

struct Inner<S, R> {
    scheduler: S,
    config: FeedConfig,
    state: Mutex<FeedState<R>>,
}

impl<S: Scheduler, R: Rng + Send + 'static> Inner<S, R> {
    fn state(&self) -> MutexGuard<'_, FeedState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(self: &Arc<Self>) {
        let now = self.scheduler.now();
        let id = {
            let mut state = self.state();
            if !state.active {
                return;
            }

            let record = state.generator.generate(now);
            let id = record.id();
            log::debug!("new transaction #{id}: {record}");

            state.records.push_front(record);
            if state.records.len() > self.config.capacity {
                if let Some(evicted) = state.records.pop_back() {
                    log::debug!("transaction #{} left the feed", evicted.id());
                }
            }
            id
        };

        self.schedule_status(id, TxStatus::Processing, self.config.processing_after);
        self.schedule_status(id, TxStatus::Completed, self.config.completed_after);
    }

    fn schedule_status(self: &Arc<Self>, id: TxId, status: TxStatus, delay: Duration) {
        let inner = Arc::downgrade(self);
        self.scheduler.schedule_after(
            delay,
            Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.set_status(id, status);
                }
            }),
        );
    }

    fn set_status(&self, id: TxId, status: TxStatus) {
        let mut state = self.state();
        // the record may have been evicted in the meantime, nothing to do then
        let Some(record) = state.records.iter_mut().find(|r| r.id() == id) else {
            return;
        };
        if record.advance_to(status) {
            log::debug!("transaction #{id} is {status}");
        }
    }
}

/// Bounded feed of synthetic transactions. While active, a new pending record is produced
/// every tick and walks through processing to completed on its own timers.
///
/// Stopping only cancels the tick: status changes already scheduled for visible records
/// still happen.
pub struct FeedSimulator<S: Scheduler, R: Rng + Send + 'static = StdRng> {
    inner: Arc<Inner<S, R>>,
}

impl<S: Scheduler> FeedSimulator<S, StdRng> {
    pub fn new(config: FeedConfig, scheduler: S) -> Result<Self, FeedError> {
        Self::with_rng(config, scheduler, StdRng::from_entropy())
    }

    pub fn seeded(config: FeedConfig, scheduler: S, seed: u64) -> Result<Self, FeedError> {
        Self::with_rng(config, scheduler, StdRng::seed_from_u64(seed))
    }
}

impl<S: Scheduler, R: Rng + Send + 'static> FeedSimulator<S, R> {
    pub fn with_rng(config: FeedConfig, scheduler: S, rng: R) -> Result<Self, FeedError> {
        config.validate()?;

        let state = FeedState {
            active: false,
            started: false,
            ticker: None,
            records: VecDeque::with_capacity(config.capacity + 1),
            generator: RecordGenerator::new(rng),
        };
        Ok(Self { inner: Arc::new(Inner { scheduler, config, state: Mutex::new(state) }) })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.inner.config
    }

    pub fn is_active(&self) -> bool {
        self.inner.state().active
    }

    pub fn start(&self) {
        let first_start = {
            let mut state = self.inner.state();
            if state.active {
                return;
            }
            state.active = true;
            let first_start = !state.started;
            state.started = true;

            let inner: Weak<Inner<S, R>> = Arc::downgrade(&self.inner);
            let ticker = self.inner.scheduler.schedule_every(
                self.inner.config.tick_interval,
                Box::new(move || {
                    if let Some(inner) = inner.upgrade() {
                        inner.tick();
                    }
                }),
            );
            state.ticker = Some(ticker);
            first_start
        };
        log::info!("feed simulation started");

        if first_start && self.inner.config.first_tick_immediate {
            self.inner.tick();
        }
    }

    pub fn stop(&self) {
        let mut state = self.inner.state();
        if !state.active {
            return;
        }
        state.active = false;
        if let Some(ticker) = state.ticker.take() {
            ticker.cancel();
        }
        log::info!("feed simulation stopped, {} transaction(s) in the feed", state.records.len());
    }

    /// Flips between active and inactive, like the page's Start/Pause button.
    /// Returns whether the feed is active afterwards.
    pub fn toggle(&self) -> bool {
        if self.is_active() {
            self.stop();
            false
        } else {
            self.start();
            true
        }
    }

    /// Copy of the visible records, newest first.
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.inner.state().records.iter().cloned().collect()
    }
}

impl<S: Scheduler, R: Rng + Send + 'static> Drop for FeedSimulator<S, R> {
    fn drop(&mut self) {
        self.stop();
    }
}
