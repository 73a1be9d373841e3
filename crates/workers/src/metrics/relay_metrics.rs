use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct RelayMetrics {
    cycles_run: AtomicU64,
    cycles_aborted: AtomicU64,
    alerts_fetched: AtomicU64,
    alerts_dropped: AtomicU64,
    notifications_delivered: AtomicU64,
    deliveries_failed: AtomicU64,
    cycle_latency_sum_us: AtomicU64,
    cycle_latency_count: AtomicU64,
}

impl RelayMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_cycles_run(&self) {
        self.cycles_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cycles_aborted(&self) {
        self.cycles_aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_alerts_fetched(&self, count: u64) {
        self.alerts_fetched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_alerts_dropped(&self) {
        self.alerts_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_notifications_delivered(&self, count: u64) {
        self.notifications_delivered
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_deliveries_failed(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.cycle_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.cycle_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycles_run_val(&self) -> u64 {
        self.cycles_run.load(Ordering::Relaxed)
    }

    pub fn cycles_aborted_val(&self) -> u64 {
        self.cycles_aborted.load(Ordering::Relaxed)
    }

    pub fn alerts_fetched_val(&self) -> u64 {
        self.alerts_fetched.load(Ordering::Relaxed)
    }

    pub fn alerts_dropped_val(&self) -> u64 {
        self.alerts_dropped.load(Ordering::Relaxed)
    }

    pub fn notifications_delivered_val(&self) -> u64 {
        self.notifications_delivered.load(Ordering::Relaxed)
    }

    pub fn deliveries_failed_val(&self) -> u64 {
        self.deliveries_failed.load(Ordering::Relaxed)
    }

    pub fn cycle_latency_vals(&self) -> (u64, u64) {
        (
            self.cycle_latency_sum_us.load(Ordering::Relaxed),
            self.cycle_latency_count.load(Ordering::Relaxed),
        )
    }
}
