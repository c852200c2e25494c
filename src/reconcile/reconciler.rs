//! Single-slot reconciliation of the quote book with the server

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::merge::union;
use super::remote::{map_records, QuoteSource};
use super::ReconcileOutcome;
use crate::book::QuoteBook;
use crate::config::Config;
use crate::models::MergePolicy;
use crate::notify::{Notification, Notifier};

/// Merges the remote collection into a quote book.
///
/// At most one reconciliation runs at a time; a request arriving while
/// another is in flight is dropped rather than queued.
pub struct Reconciler {
    source: Arc<dyn QuoteSource>,
    notifier: Arc<dyn Notifier>,
    category: String,
    policy: MergePolicy,
    notify_duration: Duration,
    in_flight: AtomicBool,
}

impl Reconciler {
    pub fn new(source: Arc<dyn QuoteSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            category: "Server".to_string(),
            policy: MergePolicy::default(),
            notify_duration: Duration::from_secs(3),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn from_config(
        source: Arc<dyn QuoteSource>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self::new(source, notifier)
            .with_category(config.sync.server_category.clone())
            .with_policy(config.sync.merge_policy)
            .with_notify_duration(config.notify.duration())
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notify_duration(mut self, duration: Duration) -> Self {
        self.notify_duration = duration;
        self
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch, merge, persist and notify.
    ///
    /// The book is locked only for the merge and save, never across the
    /// network call. On failure the book is not touched.
    pub async fn reconcile(&self, book: &Mutex<QuoteBook>) -> ReconcileOutcome {
        let Some(_slot) = InFlightSlot::acquire(&self.in_flight) else {
            debug!("Reconciliation already in flight, dropping request");
            return ReconcileOutcome::Skipped;
        };

        let records = match self.source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                info!(error = %e, "Server sync failed");
                self.notifier.notify(Notification::error(
                    format!("Failed to sync with server: {}", e),
                    self.notify_duration,
                ));
                return ReconcileOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let incoming = map_records(records, &self.category);
        let (added, recategorized, total) = {
            let mut book = book.lock().await;
            let report = union(book.quotes(), &incoming, self.policy);
            let total = report.quotes.len();
            book.replace(report.quotes);
            (report.added, report.recategorized, total)
        };

        let outcome = ReconcileOutcome::Merged {
            added,
            recategorized,
            total,
        };
        info!(%outcome, fetched = incoming.len(), "Reconciled with server");
        self.notifier.notify(Notification::success(
            format!("Quotes synced with server: {} new, {} total", added, total),
            self.notify_duration,
        ));
        outcome
    }
}

/// Holds the busy flag for the lifetime of one reconciliation
struct InFlightSlot<'a>(&'a AtomicBool);

impl<'a> InFlightSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
