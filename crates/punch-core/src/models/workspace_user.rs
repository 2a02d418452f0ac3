//! Workspace membership record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const IS_ADMIN: &str = "workspace_user.is_admin";
    pub const IS_ACTIVE: &str = "workspace_user.is_active";
    pub const WORKSPACE: &str = "workspace_user.workspace";
    pub const USER: &str = "workspace_user.user";
}

/// Membership of a user in a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceUser {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Member administers the workspace
    pub is_admin: bool,
    /// Membership accepted and active
    pub is_active: bool,
    /// Workspace (required)
    pub workspace: ForeignRef,
    /// Member (required)
    pub user: ForeignRef,
}

impl WorkspaceUser {
    /// Create a new local membership
    #[must_use]
    pub fn new(workspace: ForeignRef, user: ForeignRef) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            is_admin: false,
            is_active: true,
            workspace,
            user,
        }
    }
}

impl SyncRecord for WorkspaceUser {
    fn kind(&self) -> RecordKind {
        RecordKind::WorkspaceUser
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
        if self.is_admin != other.is_admin {
            changed.push(fields::IS_ADMIN);
        }
        if self.is_active != other.is_active {
            changed.push(fields::IS_ACTIVE);
        }
        if self.workspace != other.workspace {
            changed.push(fields::WORKSPACE);
        }
        if self.user != other.user {
            changed.push(fields::USER);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.workspace.is_unset() {
            return Err(Error::Validation(
                "workspace membership requires a workspace".into(),
            ));
        }
        if self.user.is_unset() {
            return Err(Error::Validation(
                "workspace membership requires a user".into(),
            ));
        }
        Ok(())
    }
}

impl Mergeable for WorkspaceUser {
    fn merge_fields(&mut self, winner: &Self) {
        self.is_admin = winner.is_admin;
        self.is_active = winner.is_active;
        self.workspace = winner.workspace;
        self.user = winner.user;
    }
}
