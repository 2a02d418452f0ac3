//! Client record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const NAME: &str = "client.name";
    pub const WORKSPACE: &str = "client.workspace";
}

/// A client that projects are billed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Client name
    pub name: String,
    /// Owning workspace (required)
    pub workspace: ForeignRef,
}

impl Client {
    /// Create a new local client
    #[must_use]
    pub fn new(name: impl Into<String>, workspace: ForeignRef) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            name: name.into(),
            workspace,
        }
    }
}

impl SyncRecord for Client {
    fn kind(&self) -> RecordKind {
        RecordKind::Client
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &SyncMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut SyncMeta {
        &mut self.meta
    }

    fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut changed = self.meta.changed_fields(&other.meta);
        if self.name != other.name {
            changed.push(fields::NAME);
        }
        if self.workspace != other.workspace {
            changed.push(fields::WORKSPACE);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.workspace.is_unset() {
            return Err(Error::Validation("client requires a workspace".into()));
        }
        Ok(())
    }
}

impl Mergeable for Client {
    fn merge_fields(&mut self, winner: &Self) {
        self.name = winner.name.clone();
        // Foreign-key pair moves as a unit
        self.workspace = winner.workspace;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::Merger;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 1, 10, h, m, s).unwrap()
    }

    // Base (pre-sync, dirty) -> server confirms a remote id -> newer local
    // edit. The result combines the server's bookkeeping with the local
    // edit's business data.
    #[test]
    fn server_bookkeeping_survives_newer_local_edit() {
        let workspace = ForeignRef::remote(7);
        let mut base = Client::new("Initial", workspace);
        base.meta.modified_at = ts(10, 0, 0);
        assert!(base.meta.is_dirty);

        let mut server = base.clone();
        server.meta.remote_id = Some(1);
        server.meta.is_dirty = false;
        server.meta.modified_at = ts(10, 0, 1);

        let mut local = base.clone();
        local.name = "Changed".into();
        local.meta.modified_at = ts(10, 0, 2);

        let merged = Merger::resolve(base.clone(), Some(server), Some(local));
        assert_eq!(merged.id, base.id);
        assert_eq!(merged.meta.remote_id, Some(1));
        assert_eq!(merged.name, "Changed");
        assert!(merged.meta.is_dirty);
        assert_eq!(merged.meta.modified_at, ts(10, 0, 2));
        assert_eq!(merged.workspace, workspace);
    }

    #[test]
    fn workspace_pair_moves_atomically() {
        let mut base = Client::new("Acme", ForeignRef::remote(7));
        base.meta.modified_at = ts(10, 0, 0);

        let mut edit = base.clone();
        edit.workspace = ForeignRef {
            local_id: Some(RecordId::new()),
            remote_id: Some(8),
        };
        edit.meta.modified_at = ts(10, 0, 1);

        let merged = Merger::resolve(base, None, Some(edit.clone()));
        assert_eq!(merged.workspace, edit.workspace);
        assert_eq!(merged.workspace.local_id.is_none(), merged.workspace.remote_id.is_none());
    }

    #[test]
    fn validate_requires_workspace() {
        let client = Client::new("Orphan", ForeignRef::unset());
        assert!(client.validate().is_err());
        assert!(Client::new("Ok", ForeignRef::remote(1)).validate().is_ok());
    }

    #[test]
    fn changed_fields_reports_business_and_bookkeeping() {
        let base = Client::new("Acme", ForeignRef::remote(7));
        let mut other = base.clone();
        other.name = "Acme Corp".into();
        other.meta.remote_id = Some(12);

        let changed = other.changed_fields(&base);
        assert!(changed.contains(&fields::NAME));
        assert!(changed.contains(&crate::models::meta::fields::REMOTE_ID));
        assert!(!changed.contains(&fields::WORKSPACE));
    }
}
