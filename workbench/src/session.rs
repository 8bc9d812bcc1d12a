//! Session management: the set of named databases and the single live
//! engine handle.
//!
//! [`Workbench`] owns the persistent store and the current [`Session`].
//! Exactly one engine handle is live at any instant; switching databases
//! closes the old handle and opens a new one from the target's persisted
//! snapshot. The `"default"` database is bootstrapped with the seed schema
//! whenever the store has no record for it, and can never be deleted.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use sql_workbench_core::{
    DatabaseRecord, Result, SchemaEntry, SchemaObjectKind, WorkbenchError, DEFAULT_DATABASE_ID,
    SEED_TABLES,
};
use sql_workbench_engine::EngineHandle;
use sql_workbench_store::WorkbenchStore;

use crate::config::{StoreLocation, WorkbenchConfig};
use crate::seed::{DEFAULT_DATABASE_NAME, SEED_BATCH};

/// Catalog query used to rebuild the schema cache after mutations.
const CATALOG_QUERY: &str =
    "SELECT name, type, sql FROM sqlite_master WHERE name NOT LIKE 'sqlite_%' ORDER BY name";

/// Process-wide session state: the active database, its live handle, and
/// the derived schema caches. Not persisted.
pub struct Session {
    record: DatabaseRecord,
    pub(crate) handle: EngineHandle,
    schema: Vec<SchemaEntry>,
    table_names: Vec<String>,
    query_buffer: String,
}

impl Session {
    fn new(record: DatabaseRecord, handle: EngineHandle, query_buffer: String) -> Result<Self> {
        let mut session = Self {
            record,
            handle,
            schema: Vec::new(),
            table_names: Vec::new(),
            query_buffer,
        };
        session.refresh_catalog()?;
        Ok(session)
    }

    /// Builds a session around a freshly imported handle. Used by the
    /// import codec after it has persisted the new record.
    pub(crate) fn new_for_import(
        record: DatabaseRecord,
        handle: EngineHandle,
        config: &WorkbenchConfig,
    ) -> Result<Self> {
        Self::new(record, handle, config.default_query.clone())
    }

    /// Id of the active database.
    pub fn database_id(&self) -> &str {
        &self.record.id
    }

    /// Display name of the active database.
    pub fn database_name(&self) -> &str {
        &self.record.name
    }

    /// Whether the seeded default database is active.
    pub fn is_default(&self) -> bool {
        self.record.id == DEFAULT_DATABASE_ID
    }

    /// Cached catalog of the active database's user-defined objects.
    pub fn schema(&self) -> &[SchemaEntry] {
        &self.schema
    }

    /// Cached table list. Seed-table names are omitted while a non-default
    /// database is active, mirroring `SHOW TABLES`.
    pub fn table_names(&self) -> &[String] {
        &self.table_names
    }

    /// Current contents of the SQL buffer.
    pub fn query_buffer(&self) -> &str {
        &self.query_buffer
    }

    pub(crate) fn set_query_buffer(&mut self, sql: impl Into<String>) {
        self.query_buffer = sql.into();
    }

    /// Rebuilds the schema cache and table list from the engine catalog.
    /// Called after every mutating operation.
    pub(crate) fn refresh_catalog(&mut self) -> Result<()> {
        let results = self.handle.execute(CATALOG_QUERY)?;
        let mut schema = Vec::new();
        if let Some(set) = results.last() {
            for row in &set.rows {
                let name = row.first().map(|c| c.to_string()).unwrap_or_default();
                let kind = row.get(1).map(|c| c.to_string()).unwrap_or_default();
                let Some(kind) = SchemaObjectKind::parse(&kind) else {
                    continue;
                };
                let sql = match row.get(2) {
                    Some(sql_workbench_core::CellValue::Text(s)) => Some(s.clone()),
                    _ => None,
                };
                schema.push(SchemaEntry { name, kind, sql });
            }
        }

        let is_default = self.is_default();
        self.table_names = schema
            .iter()
            .filter(|e| e.kind == SchemaObjectKind::Table)
            .filter(|e| is_default || !SEED_TABLES.contains(&e.name.as_str()))
            .map(|e| e.name.clone())
            .collect();
        self.schema = schema;
        Ok(())
    }

    /// Exports the live handle and returns the record with its snapshot
    /// brought up to date.
    pub(crate) fn export_record(&mut self) -> Result<DatabaseRecord> {
        self.record.snapshot = self.handle.export()?;
        Ok(self.record.clone())
    }
}

/// The workbench: persistent store plus the active [`Session`].
///
/// # Examples
///
/// ```
/// use sql_workbench::{Workbench, WorkbenchConfig};
///
/// let mut workbench = Workbench::open(WorkbenchConfig::default()).unwrap();
/// assert_eq!(workbench.session().database_id(), "default");
///
/// let outcome = workbench.execute("SELECT COUNT(*) FROM users").unwrap();
/// assert!(!outcome.is_failure());
/// ```
pub struct Workbench {
    pub(crate) config: WorkbenchConfig,
    pub(crate) store: WorkbenchStore,
    pub(crate) session: Session,
}

impl Workbench {
    /// Opens the workbench: opens (or creates) the store, then activates
    /// the default database — bootstrapping it with the seed schema if the
    /// store has no usable record for it.
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::EngineInit`] if the embedded engine cannot
    /// allocate a handle, or a persistence error if the store cannot be
    /// opened.
    pub fn open(config: WorkbenchConfig) -> Result<Self> {
        let store = match &config.store {
            StoreLocation::InMemory => WorkbenchStore::open_in_memory()?,
            StoreLocation::Path(path) => WorkbenchStore::open(path)?,
        };

        let session = match store.get_database(DEFAULT_DATABASE_ID)? {
            Some(record) => match Self::activate(record, &config) {
                Ok(session) => session,
                Err(WorkbenchError::CorruptDatabase { id, reason }) => {
                    warn!(%id, %reason, "default snapshot unreadable, re-bootstrapping");
                    Self::bootstrap(&store, &config)?
                }
                Err(e) => return Err(e),
            },
            None => Self::bootstrap(&store, &config)?,
        };

        Ok(Self {
            config,
            store,
            session,
        })
    }

    /// The active session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replaces the SQL buffer contents.
    pub fn set_query_buffer(&mut self, sql: impl Into<String>) {
        self.session.set_query_buffer(sql);
    }

    /// All database records in the store, metadata and snapshots included.
    pub fn databases(&self) -> Result<Vec<DatabaseRecord>> {
        self.store.get_databases()
    }

    /// Creates a new empty database, persists it, and makes it active.
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::EngineInit`] if the engine cannot allocate a
    /// handle.
    pub fn create_database(&mut self, name: &str) -> Result<String> {
        let handle = EngineHandle::open(None)?;
        let record = DatabaseRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            snapshot: handle.export()?,
            created_at: Utc::now(),
        };
        self.store.put_database(&record)?;
        debug!(id = %record.id, name, "created database");

        let id = record.id.clone();
        self.session = Session::new(record, handle, self.config.default_query.clone())?;
        Ok(id)
    }

    /// Switches to the database with the given id, deserializing its
    /// persisted snapshot into a fresh handle. The previous handle is
    /// closed; the query buffer resets to the default introspection query.
    ///
    /// # Errors
    ///
    /// [`WorkbenchError::DatabaseNotFound`] if no record has that id, and
    /// [`WorkbenchError::CorruptDatabase`] if its snapshot cannot be
    /// deserialized — in both cases the previous database stays active.
    pub fn switch_database(&mut self, id: &str) -> Result<()> {
        let record = self
            .store
            .get_database(id)?
            .ok_or_else(|| WorkbenchError::DatabaseNotFound(id.to_string()))?;

        // Open the new handle before touching the session so a failure
        // leaves the previous database active.
        let session = Self::activate(record, &self.config)?;
        debug!(from = self.session.database_id(), to = id, "switched database");
        self.session = session;
        Ok(())
    }

    /// Deletes a database record.
    ///
    /// Deleting `"default"` is a guarded no-op. If the deleted database was
    /// active, an arbitrary surviving record becomes active; if none
    /// survive, the default database is re-bootstrapped. Deleting a
    /// non-active database does not disturb the live handle.
    pub fn delete_database(&mut self, id: &str) -> Result<()> {
        if id == DEFAULT_DATABASE_ID {
            debug!("ignoring attempt to delete the default database");
            return Ok(());
        }

        if !self.store.delete_database(id)? {
            return Err(WorkbenchError::DatabaseNotFound(id.to_string()));
        }
        debug!(%id, "deleted database");

        if self.session.database_id() == id {
            let survivors = self.store.get_databases()?;
            self.session = match survivors.into_iter().next() {
                Some(record) => Self::activate(record, &self.config)?,
                None => Self::bootstrap(&self.store, &self.config)?,
            };
        }
        Ok(())
    }

    /// Replaces the default database with a fresh seed, discarding any
    /// user mutations, and makes it active. Idempotent even when the prior
    /// default record is missing or corrupt.
    ///
    /// Destructive: callers are expected to confirm with the user first.
    pub fn reset_default(&mut self) -> Result<()> {
        self.store.delete_database(DEFAULT_DATABASE_ID)?;
        self.session = Self::bootstrap(&self.store, &self.config)?;
        debug!("reset default database to seed state");
        Ok(())
    }

    /// Persists the active database's current state. Called by the
    /// pipeline after every successful execution; also usable directly to
    /// retry after a logged persistence failure.
    pub fn persist_active(&mut self) -> Result<()> {
        let record = self.session.export_record()?;
        self.store.put_database(&record)
    }

    fn activate(record: DatabaseRecord, config: &WorkbenchConfig) -> Result<Session> {
        let id = record.id.clone();
        let corrupt = |e: WorkbenchError| match e {
            WorkbenchError::EngineInit(_) => e,
            other => WorkbenchError::CorruptDatabase {
                id: id.clone(),
                reason: other.to_string(),
            },
        };
        let handle = EngineHandle::open(Some(&record.snapshot)).map_err(corrupt)?;
        let id = record.id.clone();
        Session::new(record, handle, config.default_query.clone()).map_err(|e| {
            WorkbenchError::CorruptDatabase {
                id,
                reason: e.to_string(),
            }
        })
    }

    /// Seeds and activates the default database. The fallback path
    /// whenever the store has no usable default record.
    fn bootstrap(store: &WorkbenchStore, config: &WorkbenchConfig) -> Result<Session> {
        let handle = EngineHandle::open(None)?;
        handle.execute_script(SEED_BATCH)?;

        let record = DatabaseRecord {
            id: DEFAULT_DATABASE_ID.to_string(),
            name: DEFAULT_DATABASE_NAME.to_string(),
            snapshot: handle.export()?,
            created_at: Utc::now(),
        };
        store.put_database(&record)?;
        debug!("bootstrapped default database");
        Session::new(record, handle, config.default_query.clone())
    }
}
