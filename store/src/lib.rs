//! Persistent store for the SQL workbench.
//!
//! A SQLite-backed key-value store with three independent namespaces:
//! database records (binary snapshot + metadata), saved queries, and the
//! append-only query history. See [`WorkbenchStore`] for the interface.

mod schema;
mod store;

pub use store::WorkbenchStore;
