//! Core types and errors for the SQL workbench session core.
//!
//! This crate defines the shared data model — database records, saved
//! queries, history entries, typed result sets — and the unified
//! [`WorkbenchError`] used across the engine adapter, persistent store,
//! and session layer.

mod error;
mod types;

pub use error::{Result, WorkbenchError};
pub use types::{
    CellValue, DatabaseRecord, HistoryEntry, QueryOutcome, QueryOutput, ResultSet, SavedQuery,
    SchemaEntry, SchemaObjectKind, DEFAULT_DATABASE_ID, SEED_TABLES,
};
