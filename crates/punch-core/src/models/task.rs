//! Task record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const NAME: &str = "task.name";
    pub const IS_ACTIVE: &str = "task.is_active";
    pub const ESTIMATE_SECONDS: &str = "task.estimate_seconds";
    pub const PROJECT: &str = "task.project";
    pub const WORKSPACE: &str = "task.workspace";
}

/// A task within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Task name
    pub name: String,
    /// Done tasks are inactive
    pub is_active: bool,
    /// Optional time estimate
    pub estimate_seconds: Option<i64>,
    /// Parent project (required)
    pub project: ForeignRef,
    /// Owning workspace (required)
    pub workspace: ForeignRef,
}

impl Task {
    /// Create a new local task
    #[must_use]
    pub fn new(name: impl Into<String>, project: ForeignRef, workspace: ForeignRef) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            name: name.into(),
            is_active: true,
            estimate_seconds: None,
            project,
            workspace,
        }
    }
}

impl SyncRecord for Task {
    fn kind(&self) -> RecordKind {
        RecordKind::Task
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
        if self.is_active != other.is_active {
            changed.push(fields::IS_ACTIVE);
        }
        if self.estimate_seconds != other.estimate_seconds {
            changed.push(fields::ESTIMATE_SECONDS);
        }
        if self.project != other.project {
            changed.push(fields::PROJECT);
        }
        if self.workspace != other.workspace {
            changed.push(fields::WORKSPACE);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.project.is_unset() {
            return Err(Error::Validation("task requires a project".into()));
        }
        if self.workspace.is_unset() {
            return Err(Error::Validation("task requires a workspace".into()));
        }
        Ok(())
    }
}

impl Mergeable for Task {
    fn merge_fields(&mut self, winner: &Self) {
        self.name = winner.name.clone();
        self.is_active = winner.is_active;
        self.estimate_seconds = winner.estimate_seconds;
        self.project = winner.project;
        self.workspace = winner.workspace;
    }
}
