//! Canonical-instance cache
//!
//! At most one canonical in-memory instance exists per record id; every
//! observer holding the shared handle automatically sees merge results folded
//! into it. Entries are weak: the cache is a lookup aid, never an ownership
//! mechanism, and a dropped entry only costs an extra storage read.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::models::{Record, RecordId, SyncRecord};

/// Handle to the canonical in-memory instance of a record
pub type SharedRecord = Arc<RwLock<Record>>;

/// Take a point-in-time copy of a shared record
#[must_use]
pub fn snapshot(shared: &SharedRecord) -> Record {
    shared
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Weak-entry identity cache keyed by record id
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: HashMap<RecordId, Weak<RwLock<Record>>>,
}

impl RecordCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the canonical instance for an id, pruning dead entries
    pub fn resolve(&mut self, id: RecordId) -> Option<SharedRecord> {
        match self.entries.get(&id) {
            Some(weak) => match weak.upgrade() {
                Some(shared) => Some(shared),
                None => {
                    self.entries.remove(&id);
                    None
                }
            },
            None => None,
        }
    }

    /// Fold a record into its canonical instance
    ///
    /// Updates the existing shared instance in place when one is alive, so
    /// observers keep their handle; otherwise the record becomes the new
    /// canonical instance. Either way the result carries the shared flag.
    pub fn fold(&mut self, mut record: Record) -> SharedRecord {
        record.meta_mut().is_shared = true;
        if let Some(existing) = self.resolve(record.id()) {
            *existing.write().unwrap_or_else(PoisonError::into_inner) = record;
            existing
        } else {
            let id = record.id();
            let shared = Arc::new(RwLock::new(record));
            self.entries.insert(id, Arc::downgrade(&shared));
            shared
        }
    }

    /// Number of live entries (dead ones may still be counted until pruned)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, ForeignRef};
    use pretty_assertions::assert_eq;

    fn client_record() -> Record {
        Record::from(Client::new("Acme", ForeignRef::remote(7)))
    }

    #[test]
    fn test_fold_marks_shared() {
        let mut cache = RecordCache::new();
        let shared = cache.fold(client_record());
        assert!(snapshot(&shared).meta().is_shared);
    }

    #[test]
    fn test_fold_updates_existing_instance_in_place() {
        let mut cache = RecordCache::new();
        let record = client_record();
        let id = record.id();
        let observer = cache.fold(record);

        let mut updated = snapshot(&observer);
        if let Record::Client(client) = &mut updated {
            client.name = "Acme Corp".into();
        }
        let folded = cache.fold(updated);

        // Same allocation: the observer sees the new name
        assert!(Arc::ptr_eq(&observer, &folded));
        let Record::Client(seen) = snapshot(&observer) else {
            panic!("expected a client");
        };
        assert_eq!(seen.name, "Acme Corp");
        assert_eq!(observer.read().unwrap().id(), id);
    }

    #[test]
    fn test_dropped_instances_resolve_to_none() {
        let mut cache = RecordCache::new();
        let record = client_record();
        let id = record.id();
        let shared = cache.fold(record);
        drop(shared);
        assert!(cache.resolve(id).is_none());
    }

    #[test]
    fn test_resolve_unknown_id() {
        let mut cache = RecordCache::new();
        assert!(cache.resolve(RecordId::new()).is_none());
    }
}
