//! Local change tracking
//!
//! Maintains the set of records with pending local mutations and gates which
//! of them are written in the next commit pass. Commits are all-or-nothing:
//! a storage failure leaves the tracked set intact so the caller can retry
//! the full batch, and replaying an already-committed record is a no-op
//! because the data is identical.

use std::collections::HashMap;

use crate::db::{RecordStore, StoreOp};
use crate::models::{meta, Record, RecordId, SyncRecord};
use crate::Result;

/// Tracks records whose mutations have not yet been flushed to storage
#[derive(Debug, Default)]
pub struct ChangeTracker {
    dirty: HashMap<RecordId, Record>,
}

impl ChangeTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field mutation on a record
    ///
    /// Transient bookkeeping fields never enroll a record, and neither do
    /// detached (non-shared) instances: scratch copies must not leak into
    /// the working set.
    pub fn record_changed(&mut self, record: &Record, field: &'static str) {
        if meta::fields::TRANSIENT.contains(&field) {
            return;
        }
        if !record.meta().is_shared {
            return;
        }
        self.dirty.insert(record.id(), record.clone());
    }

    /// Enroll a record that must reach storage without a mutation event
    ///
    /// Covers fresh remote adoptions and newly created local records; merely
    /// becoming shared never enrolls a record by itself.
    pub fn track_insert(&mut self, record: Record) {
        self.dirty.insert(record.id(), record);
    }

    /// Number of records awaiting commit
    #[must_use]
    pub fn pending(&self) -> usize {
        self.dirty.len()
    }

    /// Whether nothing is awaiting commit
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Flush every tracked record in one atomic storage batch
    ///
    /// Records marked persisted are upserted; records marked not-persisted
    /// (local tombstones that were never pushed) are deleted. The tracked set
    /// clears only after the batch succeeds.
    pub fn commit<S: RecordStore>(&mut self, store: &mut S) -> Result<()> {
        if self.dirty.is_empty() {
            return Ok(());
        }

        for record in self.dirty.values() {
            record.validate()?;
        }

        let ops: Vec<StoreOp> = self
            .dirty
            .values()
            .map(|record| {
                if record.meta().is_persisted {
                    StoreOp::Upsert(record.clone())
                } else {
                    StoreOp::Delete(record.id())
                }
            })
            .collect();

        store.commit_batch(&ops)?;
        tracing::debug!(records = ops.len(), "Flushed tracked changes");
        self.dirty.clear();
        Ok(())
    }
}
