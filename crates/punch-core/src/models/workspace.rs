//! Workspace record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const NAME: &str = "workspace.name";
    pub const IS_PREMIUM: &str = "workspace.is_premium";
    pub const IS_ADMIN: &str = "workspace.is_admin";
}

/// A workspace all other entities hang off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Workspace name
    pub name: String,
    /// Paid plan features are available
    pub is_premium: bool,
    /// The current user administers this workspace
    pub is_admin: bool,
}

impl Workspace {
    /// Create a new local workspace
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            name: name.into(),
            is_premium: false,
            is_admin: false,
        }
    }
}

impl SyncRecord for Workspace {
    fn kind(&self) -> RecordKind {
        RecordKind::Workspace
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
        if self.is_premium != other.is_premium {
            changed.push(fields::IS_PREMIUM);
        }
        if self.is_admin != other.is_admin {
            changed.push(fields::IS_ADMIN);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("workspace requires a name".into()));
        }
        Ok(())
    }
}

impl Mergeable for Workspace {
    fn merge_fields(&mut self, winner: &Self) {
        self.name = winner.name.clone();
        self.is_premium = winner.is_premium;
        self.is_admin = winner.is_admin;
    }
}
