//! Query execution pipeline.
//!
//! `execute` takes the raw input string through the full path: history
//! recording, pseudo-command rewriting, the reserved-table guard, engine
//! dispatch with timing, schema-cache refresh, and snapshot persistence.
//! Engine-level SQL failures are returned as data in the outcome — a
//! failed query is an expected result the caller renders inline, never an
//! `Err`. Structural failures (the guard, a missing handle) stay typed.

use std::time::Instant;

use chrono::Utc;
use tracing::warn;

use sql_workbench_core::{
    HistoryEntry, QueryOutcome, QueryOutput, Result, ResultSet, WorkbenchError, SEED_TABLES,
};

use crate::guard::find_reserved_reference;
use crate::pseudo::{classify, describe_sql, show_tables_sql, Rewrite};
use crate::session::Workbench;

impl Workbench {
    /// Executes a SQL string (or pseudo-command) against the active
    /// database.
    ///
    /// A history entry is recorded before execution, success or failure,
    /// so failed queries remain recoverable. History and snapshot writes
    /// are fire-and-forget: a persistence failure is logged and never
    /// fails the query itself.
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::ReservedTableAccess`] when a non-default database
    /// is active and the SQL references a seed table — rejected before any
    /// engine call. Engine-reported SQL errors are *not* errors here; they
    /// come back as [`QueryOutcome::Failed`].
    pub fn execute(&mut self, sql: &str) -> Result<QueryOutcome> {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Ok(QueryOutcome::Failed {
                message: "nothing to execute".to_string(),
            });
        }

        // Recorded before the engine sees anything, so the attempt is
        // recoverable from history even when it fails.
        if let Err(e) = self.store.append_history(trimmed, Utc::now()) {
            warn!(error = %e, "failed to record history entry");
        }

        let rewrite = classify(trimmed);
        let rewritten = match &rewrite {
            Rewrite::ShowTables => show_tables_sql().to_string(),
            Rewrite::Describe(table) => describe_sql(table),
            Rewrite::Passthrough => trimmed.to_string(),
        };

        if !self.session.is_default() {
            if let Some(table) = find_reserved_reference(&rewritten) {
                return Err(WorkbenchError::ReservedTableAccess(table.to_string()));
            }
        }

        let changes_before = self.session.handle.total_changes();
        let started = Instant::now();
        let results = match self.session.handle.execute(&rewritten) {
            Ok(results) => results,
            Err(e) => {
                return Ok(QueryOutcome::Failed {
                    message: e.to_string(),
                });
            }
        };
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        // Delta of the running modification counter, so DDL and pure reads
        // report zero and DML reports only its own rows.
        let rows_affected = self.session.handle.total_changes() - changes_before;

        let mut output = results
            .into_iter()
            .rev()
            .find(|set| !set.is_empty())
            .unwrap_or_default();

        if let Rewrite::ShowTables = rewrite {
            output = filter_show_tables(output, self.session.is_default());
        }

        if let Err(e) = self.session.refresh_catalog() {
            warn!(error = %e, "failed to refresh schema cache");
        }
        if let Err(e) = self.persist_active() {
            warn!(error = %e, "failed to persist snapshot after execution");
        }

        Ok(QueryOutcome::Completed(QueryOutput {
            columns: output.columns,
            rows: output.rows,
            duration_ms,
            rows_affected,
        }))
    }

    /// The newest history entries, capped by the configured view limit.
    /// The persisted log itself is unbounded.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.store.recent_history(self.config.history_limit)
    }

    /// Removes every history entry.
    ///
    /// Destructive: callers are expected to confirm with the user first.
    pub fn clear_history(&mut self) -> Result<()> {
        self.store.clear_history()
    }
}

/// Drops seed-table rows from a `SHOW TABLES` result while a non-default
/// database is active, including tables a user created under the same
/// names.
fn filter_show_tables(mut output: ResultSet, is_default: bool) -> ResultSet {
    if is_default {
        return output;
    }
    output.rows.retain(|row| {
        row.first()
            .map(|cell| !SEED_TABLES.contains(&cell.to_string().as_str()))
            .unwrap_or(true)
    });
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_workbench_core::CellValue;

    fn names(rows: &[Vec<CellValue>]) -> Vec<String> {
        rows.iter().map(|r| r[0].to_string()).collect()
    }

    #[test]
    fn test_filter_show_tables_off_default() {
        let output = ResultSet {
            columns: vec!["name".into()],
            rows: vec![
                vec![CellValue::Text("orders".into())],
                vec![CellValue::Text("users".into())],
                vec![CellValue::Text("products".into())],
            ],
        };
        let filtered = filter_show_tables(output, false);
        assert_eq!(names(&filtered.rows), vec!["orders"]);
    }

    #[test]
    fn test_filter_show_tables_on_default_keeps_everything() {
        let output = ResultSet {
            columns: vec!["name".into()],
            rows: vec![
                vec![CellValue::Text("users".into())],
                vec![CellValue::Text("orders".into())],
            ],
        };
        let filtered = filter_show_tables(output, true);
        assert_eq!(names(&filtered.rows), vec!["users", "orders"]);
    }
}
