//! CRUD interface over the three store namespaces.
//!
//! [`WorkbenchStore`] owns the store connection and exposes `put` /
//! `get_all` / `delete` per namespace, plus the bounded reverse-
//! chronological history scan and bulk clear. All failures surface as
//! [`WorkbenchError::Persistence`] so callers can log-and-continue for
//! fire-and-forget writes and propagate structural reads without
//! inspecting engine error codes.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use sql_workbench_core::{DatabaseRecord, HistoryEntry, Result, SavedQuery, WorkbenchError};

use crate::schema::generate_schema_sql;

/// Persistent key-value store with `databases`, `saved_queries`, and
/// `history` namespaces.
///
/// # Examples
///
/// ```
/// use sql_workbench_store::WorkbenchStore;
///
/// let store = WorkbenchStore::open_in_memory().unwrap();
/// assert!(store.get_databases().unwrap().is_empty());
/// ```
pub struct WorkbenchStore {
    conn: Connection,
}

impl WorkbenchStore {
    /// Opens (and initializes if needed) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(persistence)?;
        Self::init(conn)
    }

    /// Opens a transient in-memory store. Used by tests and embedding
    /// contexts that bring their own persistence.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(persistence)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(generate_schema_sql())
            .map_err(persistence)?;
        Ok(Self { conn })
    }

    // --- databases ---

    /// Inserts or fully replaces a database record.
    pub fn put_database(&self, record: &DatabaseRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO wb_databases (id, name, snapshot, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id,
                    record.name,
                    record.snapshot,
                    record.created_at.to_rfc3339()
                ],
            )
            .map_err(persistence)?;
        Ok(())
    }

    /// Loads a single database record by id.
    pub fn get_database(&self, id: &str) -> Result<Option<DatabaseRecord>> {
        self.conn
            .query_row(
                "SELECT id, name, snapshot, created_at FROM wb_databases WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(persistence)?
            .map(|(id, name, snapshot, created_at)| {
                Ok(DatabaseRecord {
                    id,
                    name,
                    snapshot,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .transpose()
    }

    /// Loads all database records, oldest first.
    pub fn get_databases(&self) -> Result<Vec<DatabaseRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, snapshot, created_at FROM wb_databases ORDER BY created_at",
            )
            .map_err(persistence)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(persistence)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(persistence)?;

        rows.into_iter()
            .map(|(id, name, snapshot, created_at)| {
                Ok(DatabaseRecord {
                    id,
                    name,
                    snapshot,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    /// Removes a database record. Returns `false` if no such id existed.
    pub fn delete_database(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM wb_databases WHERE id = ?1", params![id])
            .map_err(persistence)?;
        Ok(rows > 0)
    }

    /// Number of database records currently stored.
    pub fn database_count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM wb_databases", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as usize)
            .map_err(persistence)
    }

    // --- saved queries ---

    /// Inserts or fully replaces a saved query.
    pub fn put_saved_query(&self, query: &SavedQuery) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO wb_saved_queries (id, name, sql, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![query.id, query.name, query.sql, query.created_at.to_rfc3339()],
            )
            .map_err(persistence)?;
        Ok(())
    }

    /// Loads a single saved query by id.
    pub fn get_saved_query(&self, id: &str) -> Result<Option<SavedQuery>> {
        self.conn
            .query_row(
                "SELECT id, name, sql, created_at FROM wb_saved_queries WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(persistence)?
            .map(|(id, name, sql, created_at)| {
                Ok(SavedQuery {
                    id,
                    name,
                    sql,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .transpose()
    }

    /// Loads all saved queries, oldest first.
    pub fn get_saved_queries(&self) -> Result<Vec<SavedQuery>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, sql, created_at FROM wb_saved_queries ORDER BY created_at")
            .map_err(persistence)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(persistence)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(persistence)?;

        rows.into_iter()
            .map(|(id, name, sql, created_at)| {
                Ok(SavedQuery {
                    id,
                    name,
                    sql,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    /// Removes a saved query. Returns `false` if no such id existed.
    pub fn delete_saved_query(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM wb_saved_queries WHERE id = ?1", params![id])
            .map_err(persistence)?;
        Ok(rows > 0)
    }

    // --- history ---

    /// Appends one entry to the query log and returns it with its
    /// store-assigned monotonic id.
    pub fn append_history(&self, sql: &str, executed_at: DateTime<Utc>) -> Result<HistoryEntry> {
        self.conn
            .execute(
                "INSERT INTO wb_history (sql, executed_at) VALUES (?1, ?2)",
                params![sql, executed_at.to_rfc3339()],
            )
            .map_err(persistence)?;
        Ok(HistoryEntry {
            id: self.conn.last_insert_rowid(),
            sql: sql.to_string(),
            executed_at,
        })
    }

    /// Bounded reverse-chronological scan: the `limit` newest entries,
    /// newest first.
    pub fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, sql, executed_at FROM wb_history ORDER BY id DESC LIMIT ?1")
            .map_err(persistence)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(persistence)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(persistence)?;

        rows.into_iter()
            .map(|(id, sql, executed_at)| {
                Ok(HistoryEntry {
                    id,
                    sql,
                    executed_at: parse_timestamp(&executed_at)?,
                })
            })
            .collect()
    }

    /// Total number of logged entries (the log itself is unbounded).
    pub fn history_count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM wb_history", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as usize)
            .map_err(persistence)
    }

    /// Removes every history entry.
    pub fn clear_history(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM wb_history", [])
            .map_err(persistence)?;
        Ok(())
    }
}

fn persistence(e: rusqlite::Error) -> WorkbenchError {
    WorkbenchError::Persistence(e.to_string())
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WorkbenchError::Persistence(format!("bad timestamp '{text}': {e}")))
}
