//! Data models for Punch

pub mod client;
pub mod meta;
pub mod project;
pub mod project_user;
pub mod record;
pub mod tag;
pub mod task;
pub mod time_entry;
pub mod user;
pub mod workspace;
pub mod workspace_user;

pub use client::Client;
pub use meta::{ForeignRef, RecordId, RecordKind, SyncMeta, SyncRecord};
pub use project::Project;
pub use project_user::ProjectUser;
pub use record::Record;
pub use tag::Tag;
pub use task::Task;
pub use time_entry::{TimeEntry, TimeEntryState};
pub use user::User;
pub use workspace::Workspace;
pub use workspace_user::WorkspaceUser;
