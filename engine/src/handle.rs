//! Live engine handle over an in-memory SQLite database.
//!
//! [`EngineHandle`] is the single point of contact with the embedded
//! engine: it opens a handle from an optional binary snapshot, executes
//! SQL, reports rows modified, and exports a fresh snapshot. Exactly one
//! handle is live at a time; the session layer enforces that ownership.
//!
//! Snapshots are raw SQLite database-file images. They are produced and
//! consumed through the engine's backup API, staged via a temporary file,
//! so the exported bytes are byte-identical to a `.sqlite` file on disk.

use std::io::Write;
use std::time::Duration;

use rusqlite::backup::Backup;
use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection};
use tracing::debug;

use sql_workbench_core::{CellValue, Result, ResultSet, WorkbenchError};

/// Pages copied per backup step. One step is enough for workbench-sized
/// databases; the loop still runs to completion for larger ones.
const BACKUP_PAGES_PER_STEP: std::os::raw::c_int = 64;

/// An open, mutable, in-memory instance of the embedded engine bound to
/// one snapshot.
///
/// # Examples
///
/// ```
/// use sql_workbench_engine::EngineHandle;
///
/// let handle = EngineHandle::open(None).unwrap();
/// handle.execute_script("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);").unwrap();
///
/// let results = handle.execute("SELECT x FROM t").unwrap();
/// assert_eq!(results[0].rows.len(), 1);
///
/// let snapshot = handle.export().unwrap();
/// let restored = EngineHandle::open(Some(&snapshot)).unwrap();
/// assert_eq!(restored.execute("SELECT x FROM t").unwrap(), results);
/// ```
pub struct EngineHandle {
    conn: Connection,
}

impl EngineHandle {
    /// Opens a new handle, empty or deserialized from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorkbenchError::EngineInit`] if the engine cannot allocate
    /// an in-memory database, and a database error if the snapshot bytes do
    /// not form a valid database image.
    pub fn open(snapshot: Option<&[u8]>) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| WorkbenchError::EngineInit(e.to_string()))?;
        let mut handle = Self { conn };

        if let Some(bytes) = snapshot {
            handle.restore(bytes)?;
        }
        Ok(handle)
    }

    /// Executes one or more SQL statements, returning one [`ResultSet`]
    /// per statement. Statements without output columns (DDL/DML) yield
    /// an empty result set so callers can count statements either way.
    ///
    /// # Errors
    ///
    /// Any statement failure aborts the call; statements already executed
    /// are not rolled back (the engine has no implicit transaction here).
    pub fn execute(&self, sql: &str) -> Result<Vec<ResultSet>> {
        let mut results = Vec::new();
        let mut batch = Batch::new(&self.conn, sql);
        while let Some(mut stmt) = batch.next()? {
            if stmt.column_count() == 0 {
                stmt.execute([])?;
                results.push(ResultSet::default());
                continue;
            }

            let columns: Vec<String> =
                stmt.column_names().iter().map(|c| c.to_string()).collect();
            let mut rows = Vec::new();
            let mut raw = stmt.query([])?;
            while let Some(row) = raw.next()? {
                let mut cells = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    cells.push(cell_from_ref(row.get_ref(i)?));
                }
                rows.push(cells);
            }
            results.push(ResultSet { columns, rows });
        }
        Ok(results)
    }

    /// Executes a multi-statement script, discarding any result rows.
    /// Used for seed batches and SQL-script imports.
    pub fn execute_script(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Engine-reported number of rows modified by the most recent
    /// `INSERT`, `UPDATE` or `DELETE`. Zero for pure reads.
    pub fn rows_modified(&self) -> u64 {
        self.conn.changes()
    }

    /// Running total of rows modified over the handle's lifetime.
    ///
    /// Unlike [`rows_modified`](Self::rows_modified), this counter is a
    /// monotonic total, so the delta across one call attributes changes to
    /// that call alone — DDL and pure reads leave it untouched.
    pub fn total_changes(&self) -> u64 {
        self.conn.total_changes()
    }

    /// Exports the complete current state as a binary snapshot.
    pub fn export(&self) -> Result<Vec<u8>> {
        let staging = tempfile::Builder::new()
            .prefix("workbench-export-")
            .suffix(".sqlite")
            .tempfile()?;
        let mut dst = Connection::open(staging.path())?;
        {
            let backup = Backup::new(&self.conn, &mut dst)?;
            backup.run_to_completion(BACKUP_PAGES_PER_STEP, Duration::ZERO, None)?;
        }
        dst.close().map_err(|(_, e)| WorkbenchError::Database(e))?;

        let bytes = std::fs::read(staging.path())?;
        debug!(size = bytes.len(), "exported snapshot");
        Ok(bytes)
    }

    /// Closes the handle, releasing engine resources.
    ///
    /// Dropping the handle has the same effect; this form surfaces any
    /// close-time engine error instead of discarding it.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| WorkbenchError::Database(e))
    }

    /// Replaces the handle's contents with the given snapshot via the
    /// backup API. The snapshot must be a valid database-file image.
    fn restore(&mut self, snapshot: &[u8]) -> Result<()> {
        let mut staging = tempfile::Builder::new()
            .prefix("workbench-import-")
            .suffix(".sqlite")
            .tempfile()?;
        staging.write_all(snapshot)?;
        staging.flush()?;

        let src = Connection::open(staging.path())?;
        {
            let backup = Backup::new(&src, &mut self.conn)?;
            backup.run_to_completion(BACKUP_PAGES_PER_STEP, Duration::ZERO, None)?;
        }
        debug!(size = snapshot.len(), "restored snapshot");
        Ok(())
    }
}

/// Normalizes an engine-native value into the fixed [`CellValue`] shape.
/// Blobs surface as lowercase hex text; invalid UTF-8 is replaced.
fn cell_from_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(r) => CellValue::Real(r),
        ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => CellValue::Text(hex_encode(b)),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_empty_has_no_tables() {
        let handle = EngineHandle::open(None).unwrap();
        let results = handle
            .execute("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].rows.is_empty());
    }

    #[test]
    fn test_execute_returns_one_result_set_per_statement() {
        let handle = EngineHandle::open(None).unwrap();
        let results = handle
            .execute("CREATE TABLE t (x); INSERT INTO t VALUES (1); SELECT x FROM t")
            .unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_empty());
        assert!(results[1].is_empty());
        assert_eq!(results[2].columns, vec!["x"]);
        assert_eq!(results[2].rows, vec![vec![CellValue::Integer(1)]]);
    }

    #[test]
    fn test_rows_modified_tracks_last_dml() {
        let handle = EngineHandle::open(None).unwrap();
        handle.execute_script("CREATE TABLE t (x)").unwrap();
        handle
            .execute("INSERT INTO t VALUES (1), (2), (3)")
            .unwrap();
        assert_eq!(handle.rows_modified(), 3);

        handle.execute("SELECT * FROM t").unwrap();
        // changes() is untouched by pure reads
        assert_eq!(handle.rows_modified(), 3);
    }

    #[test]
    fn test_total_changes_delta_isolates_one_call() {
        let handle = EngineHandle::open(None).unwrap();
        handle.execute_script("CREATE TABLE t (x)").unwrap();
        handle.execute("INSERT INTO t VALUES (1), (2)").unwrap();

        // DDL leaves the running total untouched even after earlier DML.
        let before = handle.total_changes();
        handle.execute("CREATE TABLE u (y)").unwrap();
        assert_eq!(handle.total_changes() - before, 0);

        let before = handle.total_changes();
        handle.execute("DELETE FROM t").unwrap();
        assert_eq!(handle.total_changes() - before, 2);
    }

    #[test]
    fn test_cell_value_shapes() {
        let handle = EngineHandle::open(None).unwrap();
        let results = handle
            .execute("SELECT 1, 1.5, 'text', NULL, x'deadbeef'")
            .unwrap();
        assert_eq!(
            results[0].rows[0],
            vec![
                CellValue::Integer(1),
                CellValue::Real(1.5),
                CellValue::Text("text".into()),
                CellValue::Null,
                CellValue::Text("deadbeef".into()),
            ]
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let original = EngineHandle::open(None).unwrap();
        original
            .execute_script(
                "CREATE TABLE t (x INTEGER, y TEXT);
                 INSERT INTO t VALUES (1, 'one'), (2, 'two');",
            )
            .unwrap();
        let expected = original.execute("SELECT * FROM t ORDER BY x").unwrap();

        let snapshot = original.export().unwrap();
        let restored = EngineHandle::open(Some(&snapshot)).unwrap();
        let actual = restored.execute("SELECT * FROM t ORDER BY x").unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_open_rejects_garbage_snapshot() {
        assert!(EngineHandle::open(Some(b"this is not a database")).is_err());
    }

    #[test]
    fn test_execute_surfaces_sql_errors() {
        let handle = EngineHandle::open(None).unwrap();
        assert!(handle.execute("SELECT * FROM missing").is_err());
    }
}
