//! Common record identity and sync bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Result;

/// A process-local unique identifier for a record, using UUID v7 (time-sortable)
///
/// Assigned exactly once at construction and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new unique record ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The entity kind of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Client,
    Project,
    Task,
    Tag,
    User,
    Workspace,
    WorkspaceUser,
    ProjectUser,
    TimeEntry,
}

impl RecordKind {
    /// Stable name used as the storage discriminator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Project => "project",
            Self::Task => "task",
            Self::Tag => "tag",
            Self::User => "user",
            Self::Workspace => "workspace",
            Self::WorkspaceUser => "workspace_user",
            Self::ProjectUser => "project_user",
            Self::TimeEntry => "time_entry",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field identifiers for the bookkeeping fields, used for change notification
pub mod fields {
    pub const REMOTE_ID: &str = "meta.remote_id";
    pub const MODIFIED_AT: &str = "meta.modified_at";
    pub const DELETED_AT: &str = "meta.deleted_at";
    pub const IS_DIRTY: &str = "meta.is_dirty";
    pub const REMOTE_REJECTED: &str = "meta.remote_rejected";

    // Transient flags: never persisted, never enrolled in change tracking
    pub const IS_SHARED: &str = "meta.is_shared";
    pub const IS_PERSISTED: &str = "meta.is_persisted";
    pub const IS_MERGING: &str = "meta.is_merging";

    pub const TRANSIENT: &[&str] = &[IS_SHARED, IS_PERSISTED, IS_MERGING];
}

/// Sync bookkeeping shared by every record kind
///
/// These fields describe synchronization state rather than business data, and
/// resolve with "latest wins" semantics during merges rather than the plain
/// timestamp-gated overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMeta {
    /// Server-assigned identity; `None` until the record is first accepted
    pub remote_id: Option<i64>,
    /// UTC timestamp of the last local or remote mutation
    pub modified_at: DateTime<Utc>,
    /// Tombstone marker; `Some` means soft-deleted, retained until the
    /// deletion is confirmed synced
    pub deleted_at: Option<DateTime<Utc>>,
    /// Local mutations not yet confirmed by the server
    pub is_dirty: bool,
    /// The server rejected the last push attempt (validation failure)
    pub remote_rejected: bool,

    /// This instance is the canonical in-memory copy for its id
    #[serde(skip)]
    pub is_shared: bool,
    /// A row for this record should exist in storage
    #[serde(skip)]
    pub is_persisted: bool,
    /// A merge is currently rewriting this record
    #[serde(skip)]
    pub is_merging: bool,
}

impl SyncMeta {
    /// Bookkeeping for a record freshly created on this device
    #[must_use]
    pub fn new_local() -> Self {
        Self {
            remote_id: None,
            modified_at: Utc::now(),
            deleted_at: None,
            is_dirty: true,
            remote_rejected: false,
            is_shared: false,
            is_persisted: true,
            is_merging: false,
        }
    }

    /// Register a local mutation: bump the timestamp and mark dirty
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
        self.is_dirty = true;
    }

    /// Soft-delete this record
    ///
    /// A tombstone that was never pushed has nothing to confirm server-side,
    /// so its row is dropped from storage on the next commit instead.
    pub fn mark_deleted(&mut self) {
        self.deleted_at = Some(Utc::now());
        if self.remote_id.is_none() {
            self.is_persisted = false;
        }
        self.touch();
    }

    /// Whether this record carries a tombstone
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Persistent bookkeeping fields whose values differ between the two
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.remote_id != other.remote_id {
            changed.push(fields::REMOTE_ID);
        }
        if self.modified_at != other.modified_at {
            changed.push(fields::MODIFIED_AT);
        }
        if self.deleted_at != other.deleted_at {
            changed.push(fields::DELETED_AT);
        }
        if self.is_dirty != other.is_dirty {
            changed.push(fields::IS_DIRTY);
        }
        if self.remote_rejected != other.remote_rejected {
            changed.push(fields::REMOTE_REJECTED);
        }
        changed
    }
}

/// An atomic foreign-key pair
///
/// The local id and its server-side mirror always change together, never
/// independently, so a reference can never point at two different entities
/// across the two identifier spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForeignRef {
    /// Local identity of the referenced record
    pub local_id: Option<RecordId>,
    /// Server identity of the referenced record
    pub remote_id: Option<i64>,
}

impl ForeignRef {
    /// A reference pointing at nothing
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            local_id: None,
            remote_id: None,
        }
    }

    /// Reference a record by its local id
    #[must_use]
    pub const fn local(id: RecordId) -> Self {
        Self {
            local_id: Some(id),
            remote_id: None,
        }
    }

    /// Reference a record by its server id
    #[must_use]
    pub const fn remote(remote_id: i64) -> Self {
        Self {
            local_id: None,
            remote_id: Some(remote_id),
        }
    }

    /// Whether neither side of the pair is set
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.local_id.is_none() && self.remote_id.is_none()
    }
}

/// Capability contract every mergeable record implements
///
/// Replaces the source's inheritance hierarchy with composition: entities
/// embed a [`SyncMeta`] and expose it through this trait, plus compile-time
/// field identifiers for change detection and a pre-save validation hook.
pub trait SyncRecord {
    /// The entity kind of this record
    fn kind(&self) -> RecordKind;

    /// Process-local identity, immutable after construction
    fn id(&self) -> RecordId;

    /// Sync bookkeeping
    fn meta(&self) -> &SyncMeta;

    /// Mutable sync bookkeeping
    fn meta_mut(&mut self) -> &mut SyncMeta;

    /// Persistent fields (bookkeeping and business) whose values differ
    /// between the two instances
    fn changed_fields(&self, other: &Self) -> Vec<&'static str>;

    /// Pre-save validation hook; called before the record is committed
    fn validate(&self) -> Result<()>;
}
