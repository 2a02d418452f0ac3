//! Three-way record merge engine
//!
//! Reconciles concurrent local edits and remote updates for a single logical
//! record into one deterministic result. Candidates are applied in true
//! chronological order of `modified_at`; anything not strictly newer than the
//! current merged state is discarded, which makes the engine idempotent under
//! replayed server responses.

use crate::models::SyncRecord;

/// Per-entity merge declaration layered over [`Merger`]
///
/// `merge_fields` lists exactly which business fields follow overwrite-on-win
/// semantics and which foreign-key pairs move atomically. Bookkeeping fields
/// are resolved by the engine and must not be touched here.
pub trait Mergeable: SyncRecord + Clone {
    /// Copy the business fields from the winning candidate
    fn merge_fields(&mut self, winner: &Self);

    /// Restore entity invariants after field resolution
    fn repair(&mut self) {}
}

/// Merges N versions of the same logical record into one
///
/// Constructed with the record as it stood locally before any server
/// interaction in the current reconciliation window. Each [`add`](Self::add)
/// folds in one further version; [`result`](Self::result) exposes the final
/// merged record.
#[derive(Debug)]
pub struct Merger<T: Mergeable> {
    result: T,
}

impl<T: Mergeable> Merger<T> {
    /// Start a merge from the pre-sync local state
    pub const fn new(base: T) -> Self {
        Self { result: base }
    }

    /// Fold in one further version of the same logical record
    ///
    /// Stale candidates (`modified_at` not strictly newer than the current
    /// merged state) are silently discarded. Feeding a record with a
    /// different id or kind is a contract violation and panics.
    pub fn add(&mut self, candidate: T) {
        assert_eq!(
            candidate.kind(),
            self.result.kind(),
            "merger fed a record of a different kind"
        );
        assert_eq!(
            candidate.id(),
            self.result.id(),
            "merger fed a record with a different id"
        );

        if candidate.meta().modified_at <= self.result.meta().modified_at {
            // Stale or replayed candidate; ignoring it keeps merges
            // idempotent when the same update is delivered twice.
            return;
        }

        let mut merged = self.result.clone();
        merged.meta_mut().is_merging = true;
        merged.merge_fields(&candidate);

        {
            let meta = merged.meta_mut();
            let incoming = candidate.meta();
            meta.modified_at = incoming.modified_at;
            // Bookkeeping reflects the most recent accepted candidate,
            // independent of whose business data won: identities and
            // tombstones take the latest non-null value, flags the latest
            // value outright.
            if incoming.remote_id.is_some() {
                meta.remote_id = incoming.remote_id;
            }
            if incoming.deleted_at.is_some() {
                meta.deleted_at = incoming.deleted_at;
            }
            meta.is_dirty = incoming.is_dirty;
            meta.remote_rejected = incoming.remote_rejected;
            meta.is_merging = false;
        }

        merged.repair();
        self.result = merged;
    }

    /// The current merged state
    pub const fn result(&self) -> &T {
        &self.result
    }

    /// Consume the merger, yielding the merged record
    pub fn into_result(self) -> T {
        self.result
    }

    /// Resolve the canonical reconciliation window in one call
    ///
    /// Applies the server's current version before the latest local edit, so
    /// the ordering convention is structural rather than caller discipline:
    /// the last local edit wins the business data while server-assigned
    /// bookkeeping still lands.
    pub fn resolve(base: T, remote: Option<T>, local: Option<T>) -> T {
        let mut merger = Self::new(base);
        if let Some(remote) = remote {
            merger.add(remote);
        }
        if let Some(local) = local {
            merger.add(local);
        }
        merger.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, ForeignRef, Record, TimeEntry};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 1, 10, h, m, s).unwrap()
    }

    fn client_at(ts: DateTime<Utc>) -> Client {
        let mut client = Client::new("Initial", ForeignRef::remote(5));
        client.meta.modified_at = ts;
        client
    }

    #[test]
    fn stale_candidate_is_discarded() {
        let base = client_at(ts(10, 0, 5));
        let mut stale = base.clone();
        stale.name = "Older".into();
        stale.meta.modified_at = ts(10, 0, 1);

        let mut merger = Merger::new(base.clone());
        merger.add(stale);
        assert_eq!(*merger.result(), base);
    }

    #[test]
    fn equal_timestamp_is_discarded() {
        let base = client_at(ts(10, 0, 5));
        let mut same = base.clone();
        same.name = "Racer".into();

        let mut merger = Merger::new(base.clone());
        merger.add(same);
        assert_eq!(merger.result().name, "Initial");
    }

    #[test]
    fn replaying_the_same_candidate_is_a_noop() {
        let base = client_at(ts(10, 0, 0));
        let mut update = base.clone();
        update.name = "Changed".into();
        update.meta.modified_at = ts(10, 0, 1);

        let mut merger = Merger::new(base);
        merger.add(update.clone());
        let first = merger.result().clone();
        merger.add(update);
        assert_eq!(*merger.result(), first);
    }

    #[test]
    fn modified_at_is_the_maximum_of_accepted_candidates() {
        let base = client_at(ts(10, 0, 0));
        let mut newer = base.clone();
        newer.meta.modified_at = ts(10, 0, 2);
        let mut stale = base.clone();
        stale.meta.modified_at = ts(10, 0, 1);

        let mut merger = Merger::new(base);
        merger.add(newer);
        merger.add(stale);
        assert_eq!(merger.result().meta.modified_at, ts(10, 0, 2));
    }

    #[test]
    fn bookkeeping_takes_latest_nonnull_value() {
        let base = client_at(ts(10, 0, 0));

        let mut server = base.clone();
        server.meta.remote_id = Some(1);
        server.meta.is_dirty = false;
        server.meta.modified_at = ts(10, 0, 1);

        // The later local edit has no remote id, but the server-assigned one
        // must survive; dirty state follows the latest candidate.
        let mut local = base.clone();
        local.name = "Changed".into();
        local.meta.modified_at = ts(10, 0, 2);

        let merged = Merger::resolve(base, Some(server), Some(local));
        assert_eq!(merged.meta.remote_id, Some(1));
        assert!(merged.meta.is_dirty);
        assert_eq!(merged.name, "Changed");
    }

    #[test]
    fn stale_candidate_contributes_no_bookkeeping() {
        let base = client_at(ts(10, 0, 5));
        let mut stale = base.clone();
        stale.meta.remote_id = Some(99);
        stale.meta.modified_at = ts(10, 0, 1);

        let mut merger = Merger::new(base);
        merger.add(stale);
        assert_eq!(merger.result().meta.remote_id, None);
    }

    #[test]
    fn remote_rejection_clears_through_a_later_push() {
        let mut base = client_at(ts(10, 0, 0));
        base.meta.remote_rejected = true;

        let mut accepted = base.clone();
        accepted.meta.remote_rejected = false;
        accepted.meta.remote_id = Some(3);
        accepted.meta.is_dirty = false;
        accepted.meta.modified_at = ts(10, 0, 1);

        let merged = Merger::resolve(base, Some(accepted), None);
        assert!(!merged.meta.remote_rejected);
        assert!(!merged.meta.is_dirty);
    }

    #[test]
    fn tombstone_survives_merge() {
        let base = client_at(ts(10, 0, 0));
        let mut deleted = base.clone();
        deleted.meta.deleted_at = Some(ts(10, 0, 1));
        deleted.meta.modified_at = ts(10, 0, 1);

        let mut edit = base.clone();
        edit.name = "Revived name".into();
        edit.meta.modified_at = ts(10, 0, 2);

        let merged = Merger::resolve(base, Some(deleted), Some(edit));
        assert_eq!(merged.meta.deleted_at, Some(ts(10, 0, 1)));
        assert_eq!(merged.name, "Revived name");
    }

    #[test]
    fn id_is_never_overwritten() {
        let base = client_at(ts(10, 0, 0));
        let id = base.id;
        let mut update = base.clone();
        update.meta.modified_at = ts(10, 0, 1);

        let merged = Merger::resolve(base, Some(update), None);
        assert_eq!(merged.id, id);
    }

    #[test]
    #[should_panic(expected = "different id")]
    fn mismatched_id_panics() {
        let base = client_at(ts(10, 0, 0));
        let mut other = Client::new("Other", ForeignRef::remote(5));
        other.meta.modified_at = ts(10, 0, 1);

        let mut merger = Merger::new(base);
        merger.add(other);
    }

    #[test]
    #[should_panic(expected = "different kind")]
    fn mismatched_kind_panics() {
        let client = client_at(ts(10, 0, 0));
        let mut entry = TimeEntry::new(
            "Typing",
            ForeignRef::remote(1),
            ForeignRef::remote(5),
            ts(9, 0, 0),
        );
        entry.id = client.id;
        entry.meta.modified_at = ts(10, 0, 1);

        let mut merger = Merger::new(Record::from(client));
        merger.add(Record::from(entry));
    }

    #[test]
    fn result_is_independent_of_extra_stale_noise() {
        let base = client_at(ts(10, 0, 0));
        let mut server = base.clone();
        server.meta.remote_id = Some(1);
        server.meta.is_dirty = false;
        server.meta.modified_at = ts(10, 0, 1);
        let mut local = base.clone();
        local.name = "Changed".into();
        local.meta.modified_at = ts(10, 0, 2);

        let clean = Merger::resolve(base.clone(), Some(server.clone()), Some(local.clone()));

        let mut noisy = Merger::new(base.clone());
        noisy.add(server.clone());
        noisy.add(base);
        noisy.add(local);
        noisy.add(server);
        assert_eq!(noisy.into_result(), clean);
    }
}
