//! Sessions over one mapped database
//!
//! A `SessionFactory` owns the connection and the validated metamodel and
//! prepares the schema when it is built. A `Session` saves entities and runs
//! polymorphic queries; a `SessionTransaction` groups several saves.
//!
//! ## Logging
//!
//! Every session operation emits:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! all carrying the session's `session_id`. Generated SQL is logged at info
//! level when `show_sql` is set and at debug level otherwise.

use std::time::Instant;

use catalog_core::mapping::Metamodel;
use catalog_core::{
    log_op_end, log_op_error, log_op_start, parse_query, CatalogError, CatalogItem, Entity,
    ExError, Projection, QuerySpec, Record,
};
use catalog_core_types::SessionId;
use rusqlite::{Connection, Transaction};

use crate::config::{SchemaAction, StoreConfig};
use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::hydration::hydrate;
use crate::id_generator::next_id;
use crate::migrations::{apply_migrations, reset_schema};
use crate::persister::{execute_count, execute_insert, execute_select, insert_plan, select_plan};
use crate::schema::validate_schema;

/// Owns the database connection and the metamodel
pub struct SessionFactory {
    conn: Connection,
    metamodel: Metamodel,
    config: StoreConfig,
}

impl SessionFactory {
    /// Open the configured database and apply the schema action
    pub fn build(config: StoreConfig, metamodel: Metamodel) -> Result<Self> {
        let mut conn = db::open_url(&config.database.url)?;
        db::configure(&conn, config.is_in_memory())?;

        match config.database.schema_action {
            SchemaAction::Create => {
                reset_schema(&conn, &metamodel)?;
                apply_migrations(&mut conn, &metamodel)?;
            }
            SchemaAction::Update => apply_migrations(&mut conn, &metamodel)?,
            SchemaAction::Validate => validate_schema(&conn, &metamodel)?,
            SchemaAction::None => {}
        }

        tracing::info!(
            url = %config.database.url,
            schema_action = ?config.database.schema_action,
            "session factory ready"
        );

        Ok(Self {
            conn,
            metamodel,
            config,
        })
    }

    /// Fresh in-memory database with the product catalog mapping
    pub fn in_memory() -> Result<Self> {
        Self::build(StoreConfig::in_memory(), Metamodel::catalog()?)
    }

    pub fn open_session(&self) -> Session<'_> {
        let session = Session {
            factory: self,
            id: SessionId::new(),
        };
        tracing::debug!(session_id = session.id.as_str(), "session opened");
        session
    }

    /// Raw connection, for inspecting physical tables
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Close the connection, reporting any error SQLite raises on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))
    }
}

/// Unit of work against a `SessionFactory`
pub struct Session<'f> {
    factory: &'f SessionFactory,
    id: SessionId,
}

impl<'f> Session<'f> {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Start a transaction; saves made while it is open join it
    pub fn begin_transaction(&self) -> Result<SessionTransaction<'f>> {
        let tx = self
            .factory
            .conn
            .unchecked_transaction()
            .map_err(|e| from_rusqlite(e).with_session_id(self.id.clone()))?;
        tracing::debug!(session_id = self.id.as_str(), "transaction started");
        Ok(SessionTransaction {
            tx,
            session_id: self.id.clone(),
        })
    }

    /// Persist a new entity and assign its generated identifier
    ///
    /// Outside an explicit transaction the save commits on its own.
    pub fn save<E: Entity>(&self, entity: &mut E) -> Result<i64> {
        let name = E::ENTITY_NAME;
        log_op_start!("save", session_id = self.id.as_str(), entity = name);
        let start = Instant::now();

        let result = self
            .save_impl(entity)
            .map_err(|e| e.with_session_id(self.id.clone()));
        match &result {
            Ok(id) => {
                log_op_end!(
                    "save",
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = self.id.as_str(),
                    entity = name,
                    entity_id = *id
                );
            }
            Err(e) => {
                log_op_error!(
                    "save",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = self.id.as_str(),
                    entity = name
                );
            }
        }
        result
    }

    fn save_impl<E: Entity>(&self, entity: &mut E) -> Result<i64> {
        let name = E::ENTITY_NAME;
        if let Some(id) = entity.id() {
            return Err(CatalogError::AlreadyPersisted {
                entity: name.to_string(),
                id,
            }
            .into());
        }

        let model = &self.factory.metamodel;
        let hierarchy = model.root_of(name)?.name.clone();
        let record = entity.to_record();

        // Outside a transaction the savepoint opens and commits one of its own;
        // inside one, a failed save leaves neither rows nor a consumed id.
        let conn = &self.factory.conn;
        conn.execute_batch("SAVEPOINT save_entity").map_err(from_rusqlite)?;

        match self.write_rows(conn, &hierarchy, name, &record) {
            Ok(id) => {
                conn.execute_batch("RELEASE save_entity").map_err(from_rusqlite)?;
                entity.base_mut().id = Some(id);
                Ok(id)
            }
            Err(e) => {
                if let Err(undo) =
                    conn.execute_batch("ROLLBACK TO save_entity; RELEASE save_entity")
                {
                    tracing::warn!(
                        session_id = self.id.as_str(),
                        entity = name,
                        error = %undo,
                        "could not roll back failed save"
                    );
                }
                Err(e)
            }
        }
    }

    fn write_rows(
        &self,
        conn: &Connection,
        hierarchy: &str,
        name: &str,
        record: &Record,
    ) -> Result<i64> {
        let id = next_id(conn, hierarchy)?;
        for insert in insert_plan(&self.factory.metamodel, name, record, id)? {
            self.log_sql(&insert.sql());
            execute_insert(conn, &insert)?;
        }
        Ok(id)
    }

    /// Every stored instance of `entity` and its subtypes, ordered by id
    pub fn query(&self, entity: &str) -> Result<Vec<CatalogItem>> {
        self.instrumented("query", entity, || self.load(entity, None))
    }

    /// Instance of `entity` (or a subtype) with the given id
    pub fn get(&self, entity: &str, id: i64) -> Result<Option<CatalogItem>> {
        self.instrumented("get", entity, || {
            Ok(self.load(entity, Some(id))?.into_iter().next())
        })
    }

    /// Number of stored instances of `entity` and its subtypes
    pub fn count(&self, entity: &str) -> Result<u64> {
        self.instrumented("count", entity, || self.count_matching(entity, None))
    }

    /// Parse query text; the entity must be mapped
    pub fn create_query(&self, text: &str) -> Result<Query<'_>> {
        let spec =
            parse_query(text).map_err(|e| ExError::from(e).with_session_id(self.id.clone()))?;
        self.factory
            .metamodel
            .get(&spec.entity)
            .map_err(|e| ExError::from(e).with_session_id(self.id.clone()))?;
        Ok(Query {
            session: self,
            text: text.to_string(),
            spec,
        })
    }

    /// End the session
    ///
    /// Uncommitted transactions were already rolled back when dropped.
    pub fn close(self) {
        tracing::debug!(session_id = self.id.as_str(), "session closed");
    }

    fn instrumented<T>(
        &self,
        op: &'static str,
        entity: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        log_op_start!(op, session_id = self.id.as_str(), entity = entity);
        let start = Instant::now();

        let result = f().map_err(|e| e.with_session_id(self.id.clone()));
        match &result {
            Ok(_) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = self.id.as_str(),
                    entity = entity
                );
            }
            Err(e) => {
                log_op_error!(
                    op,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = self.id.as_str(),
                    entity = entity
                );
            }
        }
        result
    }

    fn load(&self, entity: &str, id: Option<i64>) -> Result<Vec<CatalogItem>> {
        let model = &self.factory.metamodel;
        let Some(plan) = select_plan(model, entity, id.is_some())? else {
            return Ok(Vec::new());
        };
        self.log_sql(&plan.sql);

        let rows = execute_select(&self.factory.conn, &plan, id)?;
        tracing::debug!(
            session_id = self.id.as_str(),
            entity,
            row_count = rows.len(),
            "rows loaded"
        );
        rows.into_iter().map(|row| hydrate(model, row)).collect()
    }

    fn count_matching(&self, entity: &str, id: Option<i64>) -> Result<u64> {
        let Some(plan) = select_plan(&self.factory.metamodel, entity, id.is_some())? else {
            return Ok(0);
        };
        let sql = plan.count_sql();
        self.log_sql(&sql);
        let count = execute_count(&self.factory.conn, &plan, id)?;
        Ok(count.max(0) as u64)
    }

    fn log_sql(&self, sql: &str) {
        if self.factory.config.database.show_sql {
            tracing::info!(session_id = self.id.as_str(), sql, "sql");
        } else {
            tracing::debug!(session_id = self.id.as_str(), sql, "sql");
        }
    }
}

/// An open transaction; dropping it without `commit` rolls back
pub struct SessionTransaction<'f> {
    tx: Transaction<'f>,
    session_id: SessionId,
}

impl SessionTransaction<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .map_err(|e| from_rusqlite(e).with_session_id(self.session_id.clone()))?;
        tracing::debug!(session_id = self.session_id.as_str(), "transaction committed");
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .map_err(|e| from_rusqlite(e).with_session_id(self.session_id.clone()))?;
        tracing::debug!(
            session_id = self.session_id.as_str(),
            "transaction rolled back"
        );
        Ok(())
    }
}

/// A parsed query bound to a session
pub struct Query<'s> {
    session: &'s Session<'s>,
    text: String,
    spec: QuerySpec,
}

impl Query<'_> {
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Matching entities; fails for `select count(*)` queries
    pub fn list(&self) -> Result<Vec<CatalogItem>> {
        if self.spec.projection == Projection::Count {
            return Err(CatalogError::InvalidQuery {
                query: self.text.clone(),
                reason: "count queries have no entity results".to_string(),
            }
            .into());
        }
        let entity = self.spec.entity.as_str();
        self.session
            .instrumented("list", entity, || self.session.load(entity, self.spec.id))
    }

    /// The single matching entity, if any
    pub fn unique_result(&self) -> Result<Option<CatalogItem>> {
        let mut items = self.list()?;
        if items.len() > 1 {
            return Err(CatalogError::NotUnique {
                entity: self.spec.entity.clone(),
                count: items.len(),
            }
            .into());
        }
        Ok(items.pop())
    }

    /// Number of matching rows, for either projection
    pub fn count(&self) -> Result<u64> {
        let entity = self.spec.entity.as_str();
        self.session.instrumented("count", entity, || {
            self.session.count_matching(entity, self.spec.id)
        })
    }
}
