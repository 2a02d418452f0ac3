//! Record store implementation

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{Record, RecordId, RecordKind, SyncRecord};

/// One write in a commit batch
#[derive(Debug, Clone)]
pub enum StoreOp {
    /// Insert the record, or replace the row with the same id
    Upsert(Record),
    /// Remove the row with this id, if any
    Delete(RecordId),
}

/// Trait for record storage operations
///
/// The change-tracking layer only assumes this contract; anything that can
/// look records up and apply a batch atomically will do.
pub trait RecordStore {
    /// Get a record by local id
    fn get(&self, id: RecordId) -> Result<Option<Record>>;

    /// Get a record by its server identity
    fn find_by_remote_id(&self, kind: RecordKind, remote_id: i64) -> Result<Option<Record>>;

    /// All records with unsynced local mutations, oldest first
    fn dirty_records(&self) -> Result<Vec<Record>>;

    /// Apply a batch of writes atomically: either every op lands or none do
    fn commit_batch(&mut self, ops: &[StoreOp]) -> Result<()>;
}

/// `SQLite` implementation of `RecordStore`
pub struct SqliteRecordStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRecordStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Deserialize a stored payload back into a record
    fn parse_record(payload: &str) -> Result<Record> {
        let mut record: Record = serde_json::from_str(payload)?;
        // Transient flags are not serialized; a loaded record is by
        // definition backed by a row.
        record.meta_mut().is_persisted = true;
        Ok(record)
    }

    fn query_payload(&self, sql: &str, args: impl rusqlite::Params) -> Result<Option<Record>> {
        let result = self
            .conn
            .query_row(sql, args, |row| row.get::<_, String>(0));

        match result {
            Ok(payload) => Ok(Some(Self::parse_record(&payload)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get(&self, id: RecordId) -> Result<Option<Record>> {
        self.query_payload(
            "SELECT payload FROM records WHERE id = ?",
            params![id.as_str()],
        )
    }

    fn find_by_remote_id(&self, kind: RecordKind, remote_id: i64) -> Result<Option<Record>> {
        self.query_payload(
            "SELECT payload FROM records WHERE kind = ? AND remote_id = ?",
            params![kind.as_str(), remote_id],
        )
    }

    fn dirty_records(&self) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM records WHERE is_dirty = 1 ORDER BY modified_at ASC",
        )?;

        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        payloads
            .iter()
            .map(|payload| Self::parse_record(payload))
            .collect()
    }

    fn commit_batch(&mut self, ops: &[StoreOp]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        for op in ops {
            match op {
                StoreOp::Upsert(record) => {
                    let meta = record.meta();
                    let payload = serde_json::to_string(record)?;
                    tx.execute(
                        "INSERT INTO records
                            (id, kind, remote_id, modified_at, deleted_at,
                             is_dirty, remote_rejected, payload)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                         ON CONFLICT(id) DO UPDATE SET
                            kind = excluded.kind,
                            remote_id = excluded.remote_id,
                            modified_at = excluded.modified_at,
                            deleted_at = excluded.deleted_at,
                            is_dirty = excluded.is_dirty,
                            remote_rejected = excluded.remote_rejected,
                            payload = excluded.payload",
                        params![
                            record.id().as_str(),
                            record.kind().as_str(),
                            meta.remote_id,
                            meta.modified_at.timestamp_millis(),
                            meta.deleted_at.map(|t| t.timestamp_millis()),
                            meta.is_dirty,
                            meta.remote_rejected,
                            payload,
                        ],
                    )?;
                }
                StoreOp::Delete(id) => {
                    tx.execute("DELETE FROM records WHERE id = ?", params![id.as_str()])?;
                }
            }
        }

        tx.commit()?;
        tracing::debug!(ops = ops.len(), "Committed record batch");
        Ok(())
    }
}
