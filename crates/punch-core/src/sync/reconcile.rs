//! Reconciliation of server records with local state
//!
//! Takes batches of entity records fetched by a remote client and folds them
//! into local state: each incoming record is correlated with its local
//! counterpart, merged server-then-local, and handed to the change tracker
//! for persistence. Merges for a given id are serialized by construction;
//! the reconciler holds exclusive access to tracker and cache while it runs.

use chrono::{DateTime, Utc};

use crate::db::RecordStore;
use crate::merge::Merger;
use crate::models::{Record, SyncRecord};
use crate::sync::{snapshot, CancelToken, ChangeTracker, RecordCache};
use crate::{Error, Result};

/// Collaborator contract for the transport layer
///
/// Implementations own retries, pagination, and authentication; this core
/// only consumes the resulting record batches. Records are expected to
/// arrive clean (`is_dirty = false`) with their server identities set.
pub trait RemoteClient {
    /// Entity records changed on the server since the given cursor
    fn changes_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Record>>;
}

/// Outcome counts of one reconciliation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Records seen for the first time and adopted as-is
    pub added: usize,
    /// Records merged with existing local state
    pub merged: usize,
    /// Records that changed nothing locally (stale or identical)
    pub unchanged: usize,
}

/// Folds remote record batches into local state
pub struct Reconciler<'a, S: RecordStore> {
    store: &'a mut S,
    tracker: &'a mut ChangeTracker,
    cache: &'a mut RecordCache,
}

impl<'a, S: RecordStore> Reconciler<'a, S> {
    /// Create a reconciler over the given collaborators
    pub fn new(
        store: &'a mut S,
        tracker: &'a mut ChangeTracker,
        cache: &'a mut RecordCache,
    ) -> Self {
        Self {
            store,
            tracker,
            cache,
        }
    }

    /// Fetch changes from the remote client and apply them
    pub fn fetch_and_apply<C: RemoteClient>(
        &mut self,
        client: &C,
        since: Option<DateTime<Utc>>,
        cancel: &CancelToken,
    ) -> Result<ReconcileSummary> {
        let incoming = client.changes_since(since)?;
        self.apply_remote(incoming, cancel)
    }

    /// Apply a batch of server records to local state
    ///
    /// Cancellation is honored between records only; a cancelled pass leaves
    /// every already-applied record fully reconciled and the rest untouched.
    pub fn apply_remote(
        &mut self,
        incoming: Vec<Record>,
        cancel: &CancelToken,
    ) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();
        for record in incoming {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.apply_one(record, &mut summary)?;
        }
        tracing::debug!(
            added = summary.added,
            merged = summary.merged,
            unchanged = summary.unchanged,
            "Applied remote batch"
        );
        Ok(summary)
    }

    /// Dirty records eligible for the next push pass
    pub fn local_changes(&self) -> Result<Vec<Record>> {
        self.store.dirty_records()
    }

    fn apply_one(&mut self, mut incoming: Record, summary: &mut ReconcileSummary) -> Result<()> {
        let stored = match self.store.get(incoming.id())? {
            Some(found) => Some(found),
            None => match incoming.meta().remote_id {
                Some(remote_id) => self.store.find_by_remote_id(incoming.kind(), remote_id)?,
                None => None,
            },
        };

        let Some(stored) = stored else {
            // First sight of this server record: adopt it as clean state.
            let meta = incoming.meta_mut();
            meta.is_dirty = false;
            meta.is_persisted = true;
            let shared = self.cache.fold(incoming);
            self.tracker.track_insert(snapshot(&shared));
            summary.added += 1;
            return Ok(());
        };

        // The payload deserialized under a fresh local id; when correlation
        // went through the remote id, the canonical local id wins.
        if incoming.id() != stored.id() {
            incoming.adopt_id(stored.id());
        }

        // A live shared instance may carry an unsynced edit that raced the
        // fetch; it joins the merge as the newest candidate.
        let local_edit = self
            .cache
            .resolve(stored.id())
            .map(|shared| snapshot(&shared))
            .filter(|record| record.meta().is_dirty && *record != stored);

        let mut merged = Merger::resolve(stored.clone(), Some(incoming), local_edit);
        if merged == stored {
            summary.unchanged += 1;
            return Ok(());
        }

        merged.meta_mut().is_persisted = true;
        let changed = merged.changed_fields(&stored);
        let shared = self.cache.fold(merged);
        let current = snapshot(&shared);
        for field in changed {
            self.tracker.record_changed(&current, field);
        }
        summary.merged += 1;
        Ok(())
    }
}
