//! User record

use serde::{Deserialize, Serialize};

use crate::merge::Mergeable;
use crate::models::meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
use crate::{Error, Result};

/// Field identifiers for change notification
pub mod fields {
    pub const NAME: &str = "user.name";
    pub const EMAIL: &str = "user.email";
    pub const TIMEZONE: &str = "user.timezone";
    pub const DEFAULT_WORKSPACE: &str = "user.default_workspace";
}

/// The account tracking time on this device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: RecordId,
    /// Sync bookkeeping
    pub meta: SyncMeta,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// IANA timezone name
    pub timezone: String,
    /// Workspace new entries land in
    pub default_workspace: ForeignRef,
}

impl User {
    /// Create a new local user
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            meta: SyncMeta::new_local(),
            name: name.into(),
            email: email.into(),
            timezone: "Etc/UTC".into(),
            default_workspace: ForeignRef::unset(),
        }
    }
}

impl SyncRecord for User {
    fn kind(&self) -> RecordKind {
        RecordKind::User
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
        if self.email != other.email {
            changed.push(fields::EMAIL);
        }
        if self.timezone != other.timezone {
            changed.push(fields::TIMEZONE);
        }
        if self.default_workspace != other.default_workspace {
            changed.push(fields::DEFAULT_WORKSPACE);
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::Validation("user requires an email".into()));
        }
        Ok(())
    }
}

impl Mergeable for User {
    fn merge_fields(&mut self, winner: &Self) {
        self.name = winner.name.clone();
        self.email = winner.email.clone();
        self.timezone = winner.timezone.clone();
        self.default_workspace = winner.default_workspace;
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
        let mut base = User::new("John", "john@example.com");
        base.meta.modified_at = ts(10, 0, 0);

        let mut server = base.clone();
        server.meta.remote_id = Some(500);
        server.meta.is_dirty = false;
        server.default_workspace = ForeignRef::remote(7);
        server.meta.modified_at = ts(10, 0, 1);

        let mut local = base.clone();
        local.timezone = "Europe/Tallinn".into();
        local.default_workspace = ForeignRef {
            local_id: Some(RecordId::new()),
            remote_id: Some(7),
        };
        local.meta.modified_at = ts(10, 0, 2);

        let merged = Merger::resolve(base, Some(server), Some(local.clone()));
        assert_eq!(merged.meta.remote_id, Some(500));
        assert_eq!(merged.timezone, "Europe/Tallinn");
        assert_eq!(merged.default_workspace, local.default_workspace);
    }

    #[test]
    fn validate_requires_email() {
        assert!(User::new("Nameless", " ").validate().is_err());
    }
}
