use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Runs a job on a fixed interval, once immediately and then every
/// `interval`. Runs never overlap; a run that overruns delays the next tick.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Loops until `stop` holds `true` or its sender is dropped. A run in
    /// progress is finished before stopping. Returns the number of runs.
    pub async fn run<F, Fut>(&self, mut job: F, mut stop: watch::Receiver<bool>) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        if *stop.borrow() {
            return 0;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut runs = 0;
        loop {
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    job().await;
                    runs += 1;
                }
            }
        }
        tracing::info!(runs, "scheduler stopped");
        runs
    }
}
