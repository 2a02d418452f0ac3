//! Storage layer for Punch

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{RecordStore, SqliteRecordStore, StoreOp};
