use std::future;

use tokio::time::{self, Instant};

pub use crate::{
    config::{FeedConfig, RunOptions},
    error::FeedError,
    export::write_snapshot,
    record::{DestAsset, SourceAsset, TransactionRecord, TxId, TxStatus},
    scheduler::{RepeatingTask, Scheduler, Task, TimerHandle, TokioScheduler, VirtualScheduler},
    simulator::FeedSimulator,
};

mod config;
mod error;
mod export;
mod record;
mod scheduler;
mod simulator;

/// Runs a feed on the wall clock for `options.duration`, handing every frame to `on_frame`
/// together with the active flag. Returns the last snapshot.
#[tokio::main(flavor = "current_thread")]
pub async fn run_feed<F: FnMut(&[TransactionRecord], bool)>(
    options: RunOptions,
    on_frame: F,
) -> Result<Vec<TransactionRecord>, FeedError> {
    internal_run_feed(options, on_frame).await
}

async fn internal_run_feed<F: FnMut(&[TransactionRecord], bool)>(
    options: RunOptions,
    mut on_frame: F,
) -> Result<Vec<TransactionRecord>, FeedError> {
    options.validate()?;

    let scheduler = TokioScheduler::new()?;
    let feed = match options.seed {
        Some(seed) => FeedSimulator::seeded(options.feed.clone(), scheduler, seed)?,
        None => FeedSimulator::new(options.feed.clone(), scheduler)?,
    };

    let started = Instant::now();
    let mut frames = time::interval_at(started + options.frame_interval, options.frame_interval);
    let deadline = time::sleep_until(started + options.duration);
    tokio::pin!(deadline);
    let pause = async {
        match options.pause_after {
            Some(after) => time::sleep_until(started + after).await,
            None => future::pending().await,
        }
    };
    tokio::pin!(pause);
    let mut paused = false;

    feed.start();
    on_frame(&feed.snapshot(), feed.is_active());

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = &mut pause, if !paused => {
                paused = true;
                feed.stop();
            },
            _ = frames.tick() => on_frame(&feed.snapshot(), feed.is_active()),
        }
    }

    let last = feed.snapshot();
    on_frame(&last, feed.is_active());
    Ok(last)
}
