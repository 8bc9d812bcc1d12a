//! Client-side SQL workbench core.
//!
//! This crate is the session manager and query execution pipeline of a
//! multi-database SQL workbench: it owns the set of named databases,
//! multiplexes one embedded SQLite engine handle across them, persists
//! snapshots to a store, intercepts the `SHOW TABLES` and `DESCRIBE`
//! pseudo-commands, tracks query history, and produces round-trippable
//! binary and SQL-dump exports.
//!
//! # Quick start
//!
//! ```
//! use sql_workbench::{CellValue, Workbench, WorkbenchConfig};
//!
//! let mut workbench = Workbench::open(WorkbenchConfig::default()).unwrap();
//!
//! // The default database comes pre-seeded.
//! let outcome = workbench.execute("SELECT COUNT(*) FROM users").unwrap();
//! let output = outcome.output().unwrap();
//! assert_eq!(output.rows[0][0], CellValue::Integer(4));
//!
//! // Pseudo-commands are rewritten into catalog queries.
//! let tables = workbench.execute("SHOW TABLES").unwrap();
//! assert_eq!(tables.output().unwrap().rows.len(), 3);
//! ```
//!
//! # Architecture
//!
//! - **`session`** — database creation, switching, deletion, reset, and
//!   the seed bootstrap; enforces single ownership of the live handle
//! - **`pipeline`** — `execute`: history, pseudo-commands, the
//!   reserved-table guard, timing, schema refresh, persistence
//! - **`codec`** — binary snapshot and SQL-dump export/import
//! - **`queries`** — saved queries with JSON exchange
//!
//! Engine access lives in `sql-workbench-engine`; persistence in
//! `sql-workbench-store`; the shared data model in `sql-workbench-core`.

mod codec;
mod config;
mod guard;
mod pipeline;
mod pseudo;
mod queries;
mod seed;
mod session;

pub use config::{StoreLocation, WorkbenchConfig};
pub use session::{Session, Workbench};

pub use sql_workbench_core::{
    CellValue, DatabaseRecord, HistoryEntry, QueryOutcome, QueryOutput, Result, ResultSet,
    SavedQuery, SchemaEntry, SchemaObjectKind, WorkbenchError, DEFAULT_DATABASE_ID, SEED_TABLES,
};
