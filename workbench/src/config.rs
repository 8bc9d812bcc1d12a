//! Workbench configuration.
//!
//! Controls where the persistent store lives, how many history entries the
//! in-memory view returns, and the introspection query the buffer resets
//! to after a database switch.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::seed::DEFAULT_QUERY;

/// Location of the persistent store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StoreLocation {
    /// Transient store, discarded when the workbench is dropped.
    #[default]
    InMemory,
    /// SQLite file at the given path, created on first open.
    Path(PathBuf),
}

/// Configuration for [`Workbench::open`](crate::Workbench::open).
///
/// # Examples
///
/// ```
/// use sql_workbench::WorkbenchConfig;
///
/// let config = WorkbenchConfig::default();
/// assert_eq!(config.history_limit, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    /// Where database records, saved queries, and history are persisted.
    pub store: StoreLocation,
    /// Cap on the in-memory history view. The persisted log is unbounded.
    pub history_limit: usize,
    /// Query placed in the buffer after bootstrap and every switch.
    pub default_query: String,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::InMemory,
            history_limit: 50,
            default_query: DEFAULT_QUERY.to_string(),
        }
    }
}

impl WorkbenchConfig {
    /// Configuration backed by a store file at `path`.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreLocation::Path(path.into()),
            ..Self::default()
        }
    }
}
