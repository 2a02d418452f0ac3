//! Kind-erased record wrapper
//!
//! Heterogeneous code paths (change tracking, storage, reconciliation) move
//! records around as [`Record`]; typed code uses the entity structs directly.

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::models::{
    Client, Project, ProjectUser, Tag, Task, TimeEntry, User, Workspace, WorkspaceUser,
};
use crate::Result;

/// One record of any entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Client(Client),
    Project(Project),
    Task(Task),
    Tag(Tag),
    User(User),
    Workspace(Workspace),
    WorkspaceUser(WorkspaceUser),
    ProjectUser(ProjectUser),
    TimeEntry(TimeEntry),
}

macro_rules! for_each_record {
    ($value:expr, $record:ident => $body:expr) => {
        match $value {
            Record::Client($record) => $body,
            Record::Project($record) => $body,
            Record::Task($record) => $body,
            Record::Tag($record) => $body,
            Record::User($record) => $body,
            Record::Workspace($record) => $body,
            Record::WorkspaceUser($record) => $body,
            Record::ProjectUser($record) => $body,
            Record::TimeEntry($record) => $body,
        }
    };
}

macro_rules! record_from {
    ($($variant:ident => $entity:ty),* $(,)?) => {
        $(impl From<$entity> for Record {
            fn from(record: $entity) -> Self {
                Self::$variant(record)
            }
        })*
    };
}

record_from! {
    Client => Client,
    Project => Project,
    Task => Task,
    Tag => Tag,
    User => User,
    Workspace => Workspace,
    WorkspaceUser => WorkspaceUser,
    ProjectUser => ProjectUser,
    TimeEntry => TimeEntry,
}

impl Record {
    /// Rebase this record onto an existing local identity
    ///
    /// Used only when a server payload, deserialized under a fresh local id,
    /// turns out to correlate (via its remote id) with a record we already
    /// hold; the canonical id always wins.
    pub(crate) fn adopt_id(&mut self, id: RecordId) {
        for_each_record!(self, record => record.id = id);
    }
}

impl SyncRecord for Record {
    fn kind(&self) -> RecordKind {
        for_each_record!(self, record => record.kind())
    }

    fn id(&self) -> RecordId {
        for_each_record!(self, record => record.id())
    }

    fn meta(&self) -> &SyncMeta {
        for_each_record!(self, record => record.meta())
    }

    fn meta_mut(&mut self) -> &mut SyncMeta {
        for_each_record!(self, record => record.meta_mut())
    }

    fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        match (self, other) {
            (Self::Client(a), Self::Client(b)) => a.changed_fields(b),
            (Self::Project(a), Self::Project(b)) => a.changed_fields(b),
            (Self::Task(a), Self::Task(b)) => a.changed_fields(b),
            (Self::Tag(a), Self::Tag(b)) => a.changed_fields(b),
            (Self::User(a), Self::User(b)) => a.changed_fields(b),
            (Self::Workspace(a), Self::Workspace(b)) => a.changed_fields(b),
            (Self::WorkspaceUser(a), Self::WorkspaceUser(b)) => a.changed_fields(b),
            (Self::ProjectUser(a), Self::ProjectUser(b)) => a.changed_fields(b),
            (Self::TimeEntry(a), Self::TimeEntry(b)) => a.changed_fields(b),
            (a, b) => panic!(
                "record kind mismatch in change detection: {} vs {}",
                a.kind(),
                b.kind()
            ),
        }
    }

    fn validate(&self) -> Result<()> {
        for_each_record!(self, record => record.validate())
    }
}

impl Mergeable for Record {
    fn merge_fields(&mut self, winner: &Self) {
        match (self, winner) {
            (Self::Client(a), Self::Client(b)) => a.merge_fields(b),
            (Self::Project(a), Self::Project(b)) => a.merge_fields(b),
            (Self::Task(a), Self::Task(b)) => a.merge_fields(b),
            (Self::Tag(a), Self::Tag(b)) => a.merge_fields(b),
            (Self::User(a), Self::User(b)) => a.merge_fields(b),
            (Self::Workspace(a), Self::Workspace(b)) => a.merge_fields(b),
            (Self::WorkspaceUser(a), Self::WorkspaceUser(b)) => a.merge_fields(b),
            (Self::ProjectUser(a), Self::ProjectUser(b)) => a.merge_fields(b),
            (Self::TimeEntry(a), Self::TimeEntry(b)) => a.merge_fields(b),
            (a, b) => panic!(
                "record kind mismatch in merge: {} vs {}",
                a.kind(),
                b.kind()
            ),
        }
    }

    fn repair(&mut self) {
        for_each_record!(self, record => record.repair());
    }
}
