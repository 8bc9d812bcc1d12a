//! Embedded SQLite engine adapter.
//!
//! Wraps the embedded engine behind a minimal contract: open a handle from
//! an optional binary snapshot, execute SQL into typed result sets, report
//! rows modified, export a fresh snapshot, close. All engine values are
//! normalized into [`CellValue`](sql_workbench_core::CellValue) at this
//! boundary so no untyped shapes leak downstream.

mod handle;

pub use handle::EngineHandle;
