//! Server reconciliation for quotebook
//!
//! Pulls a remote collection, unions it into the local book by quote
//! text and writes the result back. Runs on demand or on a fixed timer.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::book::QuoteBook;

pub mod merge;
pub mod reconciler;
pub mod remote;
pub mod scheduler;

pub use merge::{union, MergeReport};
pub use reconciler::Reconciler;
pub use remote::{map_records, HttpQuoteSource, QuoteSource, RemoteRecord};
pub use scheduler::{SchedulerStats, SyncScheduler};

/// Quote book shared between the timer and command handlers
pub type SharedBook = Arc<Mutex<QuoteBook>>;

pub fn shared(book: QuoteBook) -> SharedBook {
    Arc::new(Mutex::new(book))
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request to server failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("server response is not a record list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a single reconciliation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Remote quotes were merged and the collection was persisted
    Merged {
        added: usize,
        recategorized: usize,
        total: usize,
    },
    /// Another reconciliation was in flight; this request was dropped
    Skipped,
    /// Fetch or decode failed; local state is untouched
    Failed { reason: String },
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileOutcome::Merged {
                added,
                recategorized,
                total,
            } => write!(
                f,
                "merged: {} new, {} recategorized, {} total",
                added, recategorized, total
            ),
            ReconcileOutcome::Skipped => write!(f, "skipped: reconciliation already in flight"),
            ReconcileOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}
