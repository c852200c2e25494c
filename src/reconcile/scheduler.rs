//! Fixed-interval reconciliation timer

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::reconciler::Reconciler;
use super::{ReconcileOutcome, SharedBook};

/// Counters for reconciliations started by the scheduler
#[derive(Debug, Default)]
pub struct SchedulerStats {
    pub ticks: AtomicU64,
    pub merged: AtomicU64,
    pub skipped: AtomicU64,
    pub failed: AtomicU64,
}

impl SchedulerStats {
    fn record(&self, outcome: &ReconcileOutcome) {
        let counter = match outcome {
            ReconcileOutcome::Merged { .. } => &self.merged,
            ReconcileOutcome::Skipped => &self.skipped,
            ReconcileOutcome::Failed { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Invokes the reconciler every `period`, first after one full period.
///
/// Each tick spawns its own task so a slow server never delays the timer;
/// overlapping ticks are dropped by the reconciler's single slot.
pub struct SyncScheduler {
    reconciler: Arc<Reconciler>,
    book: SharedBook,
    period: Duration,
    max_ticks: Option<u64>,
    stats: Arc<SchedulerStats>,
}

impl SyncScheduler {
    pub fn new(reconciler: Arc<Reconciler>, book: SharedBook, period: Duration) -> Self {
        Self {
            reconciler,
            book,
            period,
            max_ticks: None,
            stats: Arc::new(SchedulerStats::default()),
        }
    }

    /// Stop after `ticks` ticks instead of running forever
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    pub fn stats(&self) -> Arc<SchedulerStats> {
        Arc::clone(&self.stats)
    }

    /// Run the timer. Returns only when bounded by `with_max_ticks`,
    /// after every spawned reconciliation has finished.
    pub async fn run(self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut pending: Vec<JoinHandle<()>> = Vec::new();

        info!(period_secs = self.period.as_secs_f64(), "Sync scheduler started");
        loop {
            if let Some(max) = self.max_ticks {
                if self.stats.ticks.load(Ordering::Relaxed) >= max {
                    break;
                }
            }

            ticker.tick().await;
            let tick = self.stats.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(tick, "Sync tick");

            let reconciler = Arc::clone(&self.reconciler);
            let book = Arc::clone(&self.book);
            let stats = Arc::clone(&self.stats);
            pending.retain(|handle| !handle.is_finished());
            pending.push(tokio::spawn(async move {
                let outcome = reconciler.reconcile(&book).await;
                stats.record(&outcome);
            }));
        }

        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "Reconciliation task aborted");
            }
        }
        info!(
            ticks = self.stats.ticks.load(Ordering::Relaxed),
            merged = self.stats.merged.load(Ordering::Relaxed),
            skipped = self.stats.skipped.load(Ordering::Relaxed),
            failed = self.stats.failed.load(Ordering::Relaxed),
            "Sync scheduler stopped"
        );
    }
}
