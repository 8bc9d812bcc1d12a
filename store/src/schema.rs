//! SQL schema for the persistent store.
//!
//! The store keeps three independent namespaces in one SQLite file:
//!
//! - `wb_databases` — id → binary snapshot + metadata
//! - `wb_saved_queries` — id → SQL text + metadata
//! - `wb_history` — append-only, time-ordered query log
//!
//! Namespaces are independent by design: saved queries and history are
//! global to the workbench, never scoped to a specific database.

/// Generates the complete store schema.
///
/// Uses `CREATE TABLE IF NOT EXISTS` so it is safe to run on every open.
/// History ids are `AUTOINCREMENT` so they stay monotonic even across
/// bulk clears.
pub(crate) fn generate_schema_sql() -> &'static str {
    r#"
CREATE TABLE IF NOT EXISTS wb_databases (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    snapshot BLOB NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS wb_saved_queries (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    sql TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS wb_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sql TEXT NOT NULL,
    executed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_wb_history_executed_at ON wb_history(executed_at);
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_contains_all_namespaces() {
        let sql = generate_schema_sql();
        assert!(sql.contains("wb_databases"));
        assert!(sql.contains("wb_saved_queries"));
        assert!(sql.contains("wb_history"));
        assert!(sql.contains("idx_wb_history_executed_at"));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(generate_schema_sql()).unwrap();
        conn.execute_batch(generate_schema_sql()).unwrap();
    }
}
