//! Tag record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const NAME: &str = "tag.name";
    pub const WORKSPACE: &str = "tag.workspace";
}

/// A label attachable to time entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Tag name
    pub name: String,
    /// Owning workspace (required)
    pub workspace: ForeignRef,
}

impl Tag {
    /// Create a new local tag
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

impl SyncRecord for Tag {
    fn kind(&self) -> RecordKind {
        RecordKind::Tag
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
            return Err(Error::Validation("tag requires a workspace".into()));
        }
        Ok(())
    }
}

impl Mergeable for Tag {
    fn merge_fields(&mut self, winner: &Self) {
        self.name = winner.name.clone();
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

    #[test]
    fn server_bookkeeping_survives_newer_local_edit() {
        let mut base = Tag::new("billed", ForeignRef::remote(7));
        base.meta.modified_at = ts(10, 0, 0);

        let mut server = base.clone();
        server.meta.remote_id = Some(88);
        server.meta.is_dirty = false;
        server.meta.modified_at = ts(10, 0, 1);

        let mut local = base.clone();
        local.name = "billable".into();
        local.workspace = ForeignRef {
            local_id: Some(RecordId::new()),
            remote_id: Some(7),
        };
        local.meta.modified_at = ts(10, 0, 2);

        let merged = Merger::resolve(base, Some(server), Some(local.clone()));
        assert_eq!(merged.meta.remote_id, Some(88));
        assert_eq!(merged.name, "billable");
        assert_eq!(merged.workspace, local.workspace);
        assert!(merged.meta.is_dirty);
    }

    #[test]
    fn validate_requires_workspace() {
        assert!(Tag::new("t", ForeignRef::unset()).validate().is_err());
    }
}
