//! SQLite persistence for normalized emails.
//!
//! Records are keyed by provider message id; re-importing a message updates
//! the stored row instead of duplicating it.

use crate::error::Result;
use crate::payload::MessagePart;
use crate::record::EmailRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS emails (
    id TEXT PRIMARY KEY,
    sender TEXT,
    subject TEXT,
    body TEXT NOT NULL DEFAULT '',
    received_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    raw_payload TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_emails_received_at ON emails(received_at DESC);
";

const UPSERT: &str = "
INSERT INTO emails (id, sender, subject, body, received_at, raw_payload)
VALUES (?1, ?2, ?3, ?4, COALESCE(?5, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')), ?6)
ON CONFLICT(id) DO UPDATE SET
    sender = excluded.sender,
    subject = excluded.subject,
    body = excluded.body,
    received_at = COALESCE(?5, received_at),
    raw_payload = excluded.raw_payload
";

const SELECT_COLUMNS: &str = "SELECT id, sender, subject, body, received_at, raw_payload FROM emails";

/// Email table backed by a SQLite connection
pub struct EmailStore {
    conn: Connection,
}

impl EmailStore {
    /// Open (and create if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a record or update the row with the same id.
    ///
    /// Timestamps are stored as UTC RFC 3339 text so they sort chronologically.
    /// A record without `received_at` is stamped with the insertion time on
    /// insert and keeps its stored timestamp on update.
    pub fn upsert(&self, record: &EmailRecord) -> Result<()> {
        upsert_on(&self.conn, record)
    }

    /// Upsert a whole batch in one transaction
    pub fn upsert_all(&mut self, records: &[EmailRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for record in records {
            upsert_on(&tx, record)?;
        }
        tx.commit()?;
        debug!("Stored {} emails", records.len());
        Ok(records.len())
    }

    pub fn get(&self, id: &str) -> Result<Option<EmailRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// All stored emails, newest first
    pub fn all(&self) -> Result<Vec<EmailRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY received_at DESC, id"))?;
        let rows = stmt.query_map([], row_to_record)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM emails", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn upsert_on(conn: &Connection, record: &EmailRecord) -> Result<()> {
    let raw_payload = serde_json::to_string(&record.raw_payload)?;
    conn.execute(
        UPSERT,
        params![
            record.id,
            record.sender,
            record.subject,
            record.body,
            record
                .received_at
                .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)),
            raw_payload,
        ],
    )?;
    Ok(())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<EmailRecord> {
    let received_at: String = row.get(4)?;
    let raw_payload: String = row.get(5)?;

    let received_at = DateTime::parse_from_rfc3339(&received_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let raw_payload: MessagePart = serde_json::from_str(&raw_payload)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(EmailRecord {
        id: row.get(0)?,
        sender: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        received_at: Some(received_at),
        raw_payload,
    })
}
