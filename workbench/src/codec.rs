//! Import/export codec for the active database.
//!
//! Two round-trippable formats: the engine's native binary snapshot
//! (pass-through, suitable for a `.sqlite` download) and a re-playable SQL
//! dump. Imports of either format mint a brand-new database record — they
//! never overwrite an existing one — and activate it immediately.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use sql_workbench_core::{
    DatabaseRecord, Result, SchemaObjectKind, WorkbenchError, SEED_TABLES,
};
use sql_workbench_engine::EngineHandle;

use crate::session::{Session, Workbench};

/// Catalog query for the dump: `tbl_name` ties indexes and triggers back
/// to the table they belong to, which drives seed-set exclusion.
const DUMP_CATALOG_QUERY: &str = "SELECT name, type, sql, tbl_name FROM sqlite_master \
     WHERE name NOT LIKE 'sqlite_%' AND sql IS NOT NULL";

#[derive(Debug)]
struct DumpObject {
    name: String,
    kind: SchemaObjectKind,
    sql: String,
    table: String,
}

impl Workbench {
    /// Raw binary snapshot of the active live handle, byte-identical to
    /// the engine's native serialization. No additional framing.
    pub fn export_binary(&self) -> Result<Vec<u8>> {
        self.session.handle.export()
    }

    /// Textual SQL dump that reconstructs the active database on replay.
    ///
    /// The script runs in a single transaction with foreign-key
    /// enforcement disabled for the duration, so replay order can never
    /// trip constraints. Tables are emitted first (each followed by its
    /// row inserts), then views, indexes, and triggers, alphabetically
    /// within each class. While a non-default database is active, objects
    /// belonging to the seed tables are excluded. `WITHOUT ROWID` tables
    /// are emitted schema-only.
    pub fn export_sql_dump(&self) -> Result<String> {
        let is_default = self.session.is_default();
        let results = self.session.handle.execute(DUMP_CATALOG_QUERY)?;

        let mut objects = Vec::new();
        if let Some(set) = results.last() {
            for row in &set.rows {
                let kind = row.get(1).map(|c| c.to_string()).unwrap_or_default();
                let Some(kind) = SchemaObjectKind::parse(&kind) else {
                    continue;
                };
                let object = DumpObject {
                    name: row.first().map(|c| c.to_string()).unwrap_or_default(),
                    kind,
                    sql: row.get(2).map(|c| c.to_string()).unwrap_or_default(),
                    table: row.get(3).map(|c| c.to_string()).unwrap_or_default(),
                };
                if !is_default && SEED_TABLES.contains(&object.table.as_str()) {
                    continue;
                }
                objects.push(object);
            }
        }
        objects.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

        let mut script = String::from("PRAGMA foreign_keys=OFF;\nBEGIN TRANSACTION;\n");
        for object in &objects {
            script.push_str(object.sql.trim());
            script.push_str(";\n");
            if object.kind == SchemaObjectKind::Table && !is_without_rowid(&object.sql) {
                self.append_table_rows(&mut script, &object.name)?;
            }
        }
        script.push_str("COMMIT;\nPRAGMA foreign_keys=ON;\n");
        Ok(script)
    }

    /// Imports a binary snapshot as a brand-new database and activates it.
    /// The name is derived from the artifact identifier (extension
    /// stripped).
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::ImportParse`] if the bytes are not a valid
    /// snapshot; nothing is persisted in that case.
    pub fn import_binary(&mut self, artifact: &str, bytes: &[u8]) -> Result<String> {
        let handle = EngineHandle::open(Some(bytes))
            .map_err(|e| WorkbenchError::ImportParse(e.to_string()))?;
        self.adopt_import(derive_name(artifact), bytes.to_vec(), handle)
    }

    /// Replays a SQL script into a fresh empty database, persists it as a
    /// brand-new record, and activates it.
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::ImportParse`] if any statement fails; the whole
    /// import aborts and no partial database is persisted.
    pub fn import_sql_script(&mut self, artifact: &str, script: &str) -> Result<String> {
        let handle = EngineHandle::open(None)?;
        handle
            .execute_script(script)
            .map_err(|e| WorkbenchError::ImportParse(e.to_string()))?;
        let snapshot = handle.export()?;
        self.adopt_import(derive_name(artifact), snapshot, handle)
    }

    fn adopt_import(
        &mut self,
        name: String,
        snapshot: Vec<u8>,
        handle: EngineHandle,
    ) -> Result<String> {
        let record = DatabaseRecord {
            id: Uuid::new_v4().to_string(),
            name,
            snapshot,
            created_at: Utc::now(),
        };
        self.store.put_database(&record)?;
        debug!(id = %record.id, name = %record.name, "imported database");

        let id = record.id.clone();
        self.session = Session::new_for_import(record, handle, &self.config)?;
        Ok(id)
    }

    fn append_table_rows(&self, script: &mut String, table: &str) -> Result<()> {
        let quoted = format!("\"{}\"", table.replace('"', "\"\""));
        let results = self
            .session
            .handle
            .execute(&format!("SELECT * FROM {quoted}"))?;

        // Natural engine export order; stable only within this call.
        if let Some(set) = results.last() {
            for row in &set.rows {
                let values: Vec<String> = row.iter().map(|c| c.to_sql_literal()).collect();
                script.push_str(&format!(
                    "INSERT INTO {quoted} VALUES ({});\n",
                    values.join(", ")
                ));
            }
        }
        Ok(())
    }
}

fn is_without_rowid(create_sql: &str) -> bool {
    create_sql.to_ascii_uppercase().contains("WITHOUT ROWID")
}

/// Derives a display name from an imported artifact identifier by
/// stripping a known extension.
fn derive_name(artifact: &str) -> String {
    let trimmed = artifact.trim();
    let stripped = [".sqlite", ".sql", ".db"]
        .iter()
        .find_map(|ext| {
            let lower = trimmed.to_ascii_lowercase();
            lower
                .strip_suffix(ext)
                .map(|stem| trimmed[..stem.len()].to_string())
        })
        .unwrap_or_else(|| trimmed.to_string());

    if stripped.is_empty() {
        "Imported database".to_string()
    } else {
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name_strips_extensions() {
        assert_eq!(derive_name("sales.sqlite"), "sales");
        assert_eq!(derive_name("Backup.SQL"), "Backup");
        assert_eq!(derive_name("archive.db"), "archive");
        assert_eq!(derive_name("plain"), "plain");
        assert_eq!(derive_name(".sqlite"), "Imported database");
    }

    #[test]
    fn test_without_rowid_detection() {
        assert!(is_without_rowid(
            "CREATE TABLE kv (k TEXT PRIMARY KEY, v) WITHOUT ROWID"
        ));
        assert!(!is_without_rowid("CREATE TABLE t (x INTEGER)"));
    }
}
