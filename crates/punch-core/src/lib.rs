//! punch-core - Core library for Punch
//!
//! This crate contains the shared record models, the three-way merge engine,
//! the local change-tracking layer, and the storage contract used by all
//! Punch interfaces (desktop, mobile, CLI).

pub mod db;
pub mod diff;
pub mod error;
pub mod merge;
pub mod models;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Record, RecordId, RecordKind};
