//! Project membership record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const IS_MANAGER: &str = "project_user.is_manager";
    pub const HOURLY_RATE: &str = "project_user.hourly_rate";
    pub const PROJECT: &str = "project_user.project";
    pub const USER: &str = "project_user.user";
}

/// Membership of a user in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUser {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Member manages the project
    pub is_manager: bool,
    /// Billing rate in cents per hour
    pub hourly_rate: i64,
    /// Project (required)
    pub project: ForeignRef,
    /// Member (required)
    pub user: ForeignRef,
}

impl ProjectUser {
    /// Create a new local membership
    #[must_use]
    pub fn new(project: ForeignRef, user: ForeignRef) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            is_manager: false,
            hourly_rate: 0,
            project,
            user,
        }
    }
}

impl SyncRecord for ProjectUser {
    fn kind(&self) -> RecordKind {
        RecordKind::ProjectUser
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
        if self.is_manager != other.is_manager {
            changed.push(fields::IS_MANAGER);
        }
        if self.hourly_rate != other.hourly_rate {
            changed.push(fields::HOURLY_RATE);
        }
        if self.project != other.project {
            changed.push(fields::PROJECT);
        }
        if self.user != other.user {
            changed.push(fields::USER);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.project.is_unset() {
            return Err(Error::Validation(
                "project membership requires a project".into(),
            ));
        }
        if self.user.is_unset() {
            return Err(Error::Validation("project membership requires a user".into()));
        }
        Ok(())
    }
}

impl Mergeable for ProjectUser {
    fn merge_fields(&mut self, winner: &Self) {
        self.is_manager = winner.is_manager;
        self.hourly_rate = winner.hourly_rate;
        self.project = winner.project;
        self.user = winner.user;
    }
}
