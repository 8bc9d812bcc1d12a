//! Saved-query management.
//!
//! Queries are saved from the current SQL buffer, listed, deleted, and
//! exchanged as JSON (`{ id, name, sql, createdAt }`). Import re-mints the
//! id and creation time — imported identifiers are never trusted.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use sql_workbench_core::{Result, SavedQuery, WorkbenchError};

use crate::session::Workbench;

/// Accepted import shape. Matches the export format; `id` and `createdAt`
/// are ignored if present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedQueryImport {
    name: String,
    sql: String,
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    created_at: Option<String>,
}

impl Workbench {
    /// Saves the current buffer contents under the given name.
    pub fn save_query(&mut self, name: &str) -> Result<SavedQuery> {
        let query = SavedQuery {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            sql: self.session.query_buffer().trim().to_string(),
            created_at: Utc::now(),
        };
        self.store.put_saved_query(&query)?;
        Ok(query)
    }

    /// All saved queries, oldest first.
    pub fn saved_queries(&self) -> Result<Vec<SavedQuery>> {
        self.store.get_saved_queries()
    }

    /// Deletes a saved query. Returns `false` if no such id existed.
    ///
    /// Destructive: callers are expected to confirm with the user first.
    pub fn delete_saved_query(&mut self, id: &str) -> Result<bool> {
        self.store.delete_saved_query(id)
    }

    /// Loads a saved query into the buffer and returns it, or `None` if
    /// the id is unknown.
    pub fn load_saved_query(&mut self, id: &str) -> Result<Option<SavedQuery>> {
        let Some(query) = self.store.get_saved_query(id)? else {
            return Ok(None);
        };
        self.session.set_query_buffer(query.sql.clone());
        Ok(Some(query))
    }

    /// Exports one saved query as pretty-printed JSON, or `None` if the
    /// id is unknown.
    pub fn export_saved_query(&self, id: &str) -> Result<Option<String>> {
        match self.store.get_saved_query(id)? {
            Some(query) => Ok(Some(serde_json::to_string_pretty(&query)?)),
            None => Ok(None),
        }
    }

    /// Imports a saved query from JSON, minting a fresh id and creation
    /// time regardless of what the source claims.
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::ImportParse`] if the JSON does not carry `name`
    /// and `sql` fields.
    pub fn import_saved_query(&mut self, json: &str) -> Result<SavedQuery> {
        let imported: SavedQueryImport = serde_json::from_str(json)
            .map_err(|e| WorkbenchError::ImportParse(e.to_string()))?;

        let query = SavedQuery {
            id: Uuid::new_v4().to_string(),
            name: imported.name,
            sql: imported.sql,
            created_at: Utc::now(),
        };
        self.store.put_saved_query(&query)?;
        Ok(query)
    }
}
