//! Time entry record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const DESCRIPTION: &str = "time_entry.description";
    pub const STATE: &str = "time_entry.state";
    pub const START_TIME: &str = "time_entry.start_time";
    pub const STOP_TIME: &str = "time_entry.stop_time";
    pub const IS_BILLABLE: &str = "time_entry.is_billable";
    pub const USER: &str = "time_entry.user";
    pub const WORKSPACE: &str = "time_entry.workspace";
    pub const PROJECT: &str = "time_entry.project";
    pub const TASK: &str = "time_entry.task";
}

/// Lifecycle state of a time entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEntryState {
    /// Created but not yet started
    New,
    /// The clock is running
    Running,
    /// Stopped; `stop_time` is set
    Finished,
}

/// A tracked span of time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// What was worked on
    pub description: String,
    /// Lifecycle state
    pub state: TimeEntryState,
    /// When the clock started
    pub start_time: DateTime<Utc>,
    /// When the clock stopped; must be `None` while running
    pub stop_time: Option<DateTime<Utc>>,
    /// Entry is billable
    pub is_billable: bool,
    /// Tracking user (required)
    pub user: ForeignRef,
    /// Owning workspace (required)
    pub workspace: ForeignRef,
    /// Project the entry is booked against
    pub project: ForeignRef,
    /// Task within the project
    pub task: ForeignRef,
}

impl TimeEntry {
    /// Create a new local entry, not yet running
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        user: ForeignRef,
        workspace: ForeignRef,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            description: description.into(),
            state: TimeEntryState::New,
            start_time,
            stop_time: None,
            is_billable: false,
            user,
            workspace,
            project: ForeignRef::unset(),
            task: ForeignRef::unset(),
        }
    }

    /// Start the clock
    pub fn start(&mut self) {
        self.state = TimeEntryState::Running;
        self.stop_time = None;
        self.meta.touch();
    }

    /// Stop the clock at the given instant
    pub fn stop(&mut self, at: DateTime<Utc>) {
        self.state = TimeEntryState::Finished;
        self.stop_time = Some(at);
        self.meta.touch();
    }
}

impl SyncRecord for TimeEntry {
    fn kind(&self) -> RecordKind {
        RecordKind::TimeEntry
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
        if self.description != other.description {
            changed.push(fields::DESCRIPTION);
        }
        if self.state != other.state {
            changed.push(fields::STATE);
        }
        if self.start_time != other.start_time {
            changed.push(fields::START_TIME);
        }
        if self.stop_time != other.stop_time {
            changed.push(fields::STOP_TIME);
        }
        if self.is_billable != other.is_billable {
            changed.push(fields::IS_BILLABLE);
        }
        if self.user != other.user {
            changed.push(fields::USER);
        }
        if self.workspace != other.workspace {
            changed.push(fields::WORKSPACE);
        }
        if self.project != other.project {
            changed.push(fields::PROJECT);
        }
        if self.task != other.task {
            changed.push(fields::TASK);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.user.is_unset() {
            return Err(Error::Validation("time entry requires a user".into()));
        }
        if self.workspace.is_unset() {
            return Err(Error::Validation("time entry requires a workspace".into()));
        }
        if self.state == TimeEntryState::Running && self.stop_time.is_some() {
            return Err(Error::Validation(
                "running time entry cannot have a stop time".into(),
            ));
        }
        Ok(())
    }
}

impl Mergeable for TimeEntry {
    fn merge_fields(&mut self, winner: &Self) {
        self.description = winner.description.clone();
        self.state = winner.state;
        self.start_time = winner.start_time;
        self.stop_time = winner.stop_time;
        self.is_billable = winner.is_billable;
        self.user = winner.user;
        self.workspace = winner.workspace;
        self.project = winner.project;
        self.task = winner.task;
    }

    fn repair(&mut self) {
        // Running + stop time is an invalid combination a merge can produce
        // when state and stop_time resolve from different candidates.
        if self.state == TimeEntryState::Running {
            self.stop_time = None;
        }
    }
}
