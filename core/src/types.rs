//! Data model for the workbench session core.
//!
//! These types are the shared vocabulary between the engine adapter, the
//! persistent store, and the session layer. They are designed for
//! serialization with [`serde`] and round-trip through JSON and SQLite
//! storage without loss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved id of the seeded default database.
///
/// Exactly one record with this id exists in the store at all times after
/// initialization; it can never be deleted, only reset.
pub const DEFAULT_DATABASE_ID: &str = "default";

/// Table names created by the default-database bootstrap.
///
/// These names are protection-scoped to the default database: queries
/// against them are rejected while any other database is active.
pub const SEED_TABLES: [&str; 3] = ["users", "products", "departments"];

/// A persisted database: identity, display name, and the last successfully
/// exported engine snapshot.
///
/// The snapshot is an opaque SQLite database-file image. It is stale between
/// a mutation and the next persistence flush; the live handle is the source
/// of truth while a database is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRecord {
    /// Unique id; `"default"` is reserved for the seeded database.
    pub id: String,
    /// Display name chosen by the user.
    pub name: String,
    /// Engine-native binary snapshot of the complete database state.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub snapshot: Vec<u8>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A named SQL query saved from the workbench buffer.
///
/// Immutable once saved except by full replacement; global to the
/// workbench, not scoped to any database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    pub id: String,
    pub name: String,
    pub sql: String,
    pub created_at: DateTime<Utc>,
}

/// One entry in the append-only query log.
///
/// Recorded before every execution attempt, success or failure, so failed
/// queries remain recoverable. Ids are monotonically increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub sql: String,
    pub executed_at: DateTime<Utc>,
}

/// A single cell value as surfaced by the engine adapter.
///
/// The adapter normalizes every engine-native value into this fixed shape
/// so downstream code never branches on untyped rows. Blobs are rendered
/// as lowercase hex text at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    /// Renders the cell as a SQL literal suitable for an `INSERT` statement:
    /// `NULL` for null, unquoted digits for numbers, single-quoted text with
    /// embedded quotes doubled.
    pub fn to_sql_literal(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Real(r) => r.to_string(),
            CellValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Real(r) => write!(f, "{r}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Columns and rows produced by one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// Kind of a schema object in the engine catalog.
///
/// The ordering of the variants is the dependency-safe emission order used
/// by the SQL-dump codec: tables first, triggers last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaObjectKind {
    Table,
    View,
    Index,
    Trigger,
}

impl SchemaObjectKind {
    /// Parses the `type` column of `sqlite_master`. Unknown kinds map to `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "table" => Some(Self::Table),
            "view" => Some(Self::View),
            "index" => Some(Self::Index),
            "trigger" => Some(Self::Trigger),
            _ => None,
        }
    }
}

/// One user-defined object from the active database's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub kind: SchemaObjectKind,
    /// Original `CREATE` statement; absent for auto-created objects such as
    /// implicit unique indexes.
    pub sql: Option<String>,
}

/// Successful query execution: the final statement's result set plus
/// execution metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Wall-clock execution time in milliseconds.
    pub duration_ms: f64,
    /// Engine-reported count of modified rows; zero for pure reads.
    pub rows_affected: u64,
}

/// Outcome of a pipeline execution. Result and error are mutually
/// exclusive: a failed query carries only its message and zero duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryOutcome {
    Completed(QueryOutput),
    Failed { message: String },
}

impl QueryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, QueryOutcome::Failed { .. })
    }

    /// Returns the output of a completed execution, or `None` on failure.
    pub fn output(&self) -> Option<&QueryOutput> {
        match self {
            QueryOutcome::Completed(out) => Some(out),
            QueryOutcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_literal_escaping() {
        assert_eq!(CellValue::Null.to_sql_literal(), "NULL");
        assert_eq!(CellValue::Integer(42).to_sql_literal(), "42");
        assert_eq!(CellValue::Real(1.5).to_sql_literal(), "1.5");
        assert_eq!(
            CellValue::Text("O'Brien".into()).to_sql_literal(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_schema_object_kind_parse() {
        assert_eq!(SchemaObjectKind::parse("table"), Some(SchemaObjectKind::Table));
        assert_eq!(SchemaObjectKind::parse("view"), Some(SchemaObjectKind::View));
        assert_eq!(SchemaObjectKind::parse("index"), Some(SchemaObjectKind::Index));
        assert_eq!(SchemaObjectKind::parse("trigger"), Some(SchemaObjectKind::Trigger));
        assert_eq!(SchemaObjectKind::parse("shadow"), None);
    }

    #[test]
    fn test_schema_object_kind_dump_order() {
        let mut kinds = vec![
            SchemaObjectKind::Trigger,
            SchemaObjectKind::Index,
            SchemaObjectKind::Table,
            SchemaObjectKind::View,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                SchemaObjectKind::Table,
                SchemaObjectKind::View,
                SchemaObjectKind::Index,
                SchemaObjectKind::Trigger,
            ]
        );
    }

    #[test]
    fn test_query_outcome_accessors() {
        let ok = QueryOutcome::Completed(QueryOutput {
            columns: vec!["n".into()],
            rows: vec![vec![CellValue::Integer(1)]],
            duration_ms: 0.3,
            rows_affected: 0,
        });
        assert!(!ok.is_failure());
        assert_eq!(ok.output().unwrap().rows.len(), 1);

        let err = QueryOutcome::Failed {
            message: "no such table: t".into(),
        };
        assert!(err.is_failure());
        assert!(err.output().is_none());
    }
}
