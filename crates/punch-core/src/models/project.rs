//! Project record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const NAME: &str = "project.name";
    pub const COLOR: &str = "project.color";
    pub const IS_ACTIVE: &str = "project.is_active";
    pub const IS_BILLABLE: &str = "project.is_billable";
    pub const IS_PRIVATE: &str = "project.is_private";
    pub const CLIENT: &str = "project.client";
    pub const WORKSPACE: &str = "project.workspace";
}

/// A project time entries are booked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Project name
    pub name: String,
    /// Display color index
    pub color: i32,
    /// Archived projects are inactive
    pub is_active: bool,
    /// New entries default to billable
    pub is_billable: bool,
    /// Visible only to project members
    pub is_private: bool,
    /// Client billed for this project (optional)
    pub client: ForeignRef,
    /// Owning workspace (required)
    pub workspace: ForeignRef,
}

impl Project {
    /// Create a new local project
    #[must_use]
    pub fn new(name: impl Into<String>, workspace: ForeignRef) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            name: name.into(),
            color: 0,
            is_active: true,
            is_billable: false,
            is_private: false,
            client: ForeignRef::unset(),
            workspace,
        }
    }
}

impl SyncRecord for Project {
    fn kind(&self) -> RecordKind {
        RecordKind::Project
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
        if self.color != other.color {
            changed.push(fields::COLOR);
        }
        if self.is_active != other.is_active {
            changed.push(fields::IS_ACTIVE);
        }
        if self.is_billable != other.is_billable {
            changed.push(fields::IS_BILLABLE);
        }
        if self.is_private != other.is_private {
            changed.push(fields::IS_PRIVATE);
        }
        if self.client != other.client {
            changed.push(fields::CLIENT);
        }
        if self.workspace != other.workspace {
            changed.push(fields::WORKSPACE);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.workspace.is_unset() {
            return Err(Error::Validation("project requires a workspace".into()));
        }
        Ok(())
    }
}

impl Mergeable for Project {
    fn merge_fields(&mut self, winner: &Self) {
        self.name = winner.name.clone();
        self.color = winner.color;
        self.is_active = winner.is_active;
        self.is_billable = winner.is_billable;
        self.is_private = winner.is_private;
        // Foreign-key pairs move as whole pairs
        self.client = winner.client;
        self.workspace = winner.workspace;
    }
}
