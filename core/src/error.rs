//! Error types for workbench operations.
//!
//! Provides a unified error type covering engine initialization, session
//! management, import parsing, and persistence failures.

use thiserror::Error;

/// Errors that can occur during workbench operations.
///
/// Engine-reported SQL failures are deliberately *not* represented here:
/// a failed query is an expected outcome that the pipeline returns as data
/// (see `QueryOutcome::Failed`), never as an `Err`.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// The embedded SQL engine failed to initialize. Fatal to the session.
    #[error("engine initialization failed: {0}")]
    EngineInit(String),

    /// No database record exists for the requested id.
    #[error("database not found: {0}")]
    DatabaseNotFound(String),

    /// A stored snapshot could not be deserialized into a live handle.
    /// The previously active database remains active.
    #[error("corrupt database snapshot for '{id}': {reason}")]
    CorruptDatabase { id: String, reason: String },

    /// The query references a seed table while a non-default database is
    /// active. Rejected before reaching the engine.
    #[error("table '{0}' belongs to the default database and cannot be accessed here")]
    ReservedTableAccess(String),

    /// An import source could not be replayed into a fresh database.
    /// No partial state is persisted.
    #[error("import failed: {0}")]
    ImportParse(String),

    /// Persistent store read/write failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// SQLite database operation failure outside the query path.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O failure (snapshot staging, store files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure (saved-query import/export).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`WorkbenchError`].
pub type Result<T> = std::result::Result<T, WorkbenchError>;
