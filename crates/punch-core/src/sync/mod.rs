//! Sync state: change tracking, identity sharing, and reconciliation

mod cache;
mod reconcile;
mod tracker;

pub use cache::{snapshot, RecordCache, SharedRecord};
pub use reconcile::{ReconcileSummary, Reconciler, RemoteClient};
pub use tracker::ChangeTracker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag
///
/// Checked only between top-level sync operations, never in the middle of a
/// single merge, so cancellation can never leave a record half-reconciled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; all clones observe it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
