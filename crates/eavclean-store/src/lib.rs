//! eavclean Storage Layer
//!
//! Implements the [`TabularStore`], [`ScopeDirectory`] and [`AttributeDirectory`]
//! traits on top of SQLite.
//!
//! # Architecture
//!
//! - The structured query model from `eavclean-domain` is rendered to SQL with
//!   bound parameters (see the `sql` module); sweeps never build SQL strings
//! - Every [`TabularStore::stream`] call prepares its own statement, so a row
//!   visitor can issue nested reads and deletes on the same connection
//! - Physical table names are the logical names plus an optional prefix
//!
//! # Examples
//!
//! ```no_run
//! use eavclean_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for sweeps
//! ```

#![warn(missing_docs)]

mod sql;

use eavclean_domain::{
    AttributeDirectory, Predicate, Row, ScopeDirectory, Select, StreamError, TabularStore,
};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A table or column name that is not a plain identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based tabular store
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance; sweeps are single-threaded anyway.
pub struct SqliteStore {
    conn: Connection,
    prefix: String,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use eavclean_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("shop.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_prefix(path, "")
    }

    /// Like [`SqliteStore::new`], with every table name carrying `prefix`
    pub fn with_prefix<P: AsRef<Path>>(path: P, prefix: &str) -> Result<Self, StoreError> {
        let valid_prefix = prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_prefix {
            return Err(StoreError::InvalidIdentifier(prefix.to_string()));
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            prefix: prefix.to_string(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        if self.prefix.is_empty() {
            self.conn.execute_batch(schema)?;
        } else {
            self.conn.execute_batch(&prefix_schema(schema, &self.prefix))?;
        }
        Ok(())
    }

    /// Underlying connection, for seeding fixtures and ad-hoc inspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Configured table prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Prefix every table created or indexed by the schema script
fn prefix_schema(schema: &str, prefix: &str) -> String {
    schema
        .replace("CREATE TABLE IF NOT EXISTS ", &format!("CREATE TABLE IF NOT EXISTS {}", prefix))
        .replace("CREATE INDEX IF NOT EXISTS idx_", &format!("CREATE INDEX IF NOT EXISTS idx_{}", prefix))
        .replace(" ON ", &format!(" ON {}", prefix))
}

impl TabularStore for SqliteStore {
    type Error = StoreError;

    fn table(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn count(&self, table: &str, filter: &Predicate) -> Result<u64, Self::Error> {
        let rendered = sql::render_count(table, filter)?;
        tracing::debug!(sql = %rendered.sql, "count");

        let count: i64 = self
            .conn
            .query_row(&rendered.sql, params_from_iter(rendered.params.iter()), |row| row.get(0))?;
        u64::try_from(count).map_err(|_| StoreError::InvalidData(format!("negative count: {}", count)))
    }

    fn delete(&self, table: &str, filter: &Predicate) -> Result<u64, Self::Error> {
        let rendered = sql::render_delete(table, filter)?;
        tracing::debug!(sql = %rendered.sql, "delete");

        let affected = self
            .conn
            .execute(&rendered.sql, params_from_iter(rendered.params.iter()))?;
        Ok(affected as u64)
    }

    fn stream<V, F>(&self, select: &Select, mut visit: F) -> Result<u64, StreamError<Self::Error, V>>
    where
        F: FnMut(Row) -> Result<(), V>,
    {
        let rendered = sql::render_select(select).map_err(StreamError::Store)?;
        tracing::debug!(sql = %rendered.sql, "stream");

        // Not prepare_cached: a nested stream must never share this cursor.
        let mut stmt = self
            .conn
            .prepare(&rendered.sql)
            .map_err(|e| StreamError::Store(e.into()))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt
            .query(params_from_iter(rendered.params.iter()))
            .map_err(|e| StreamError::Store(e.into()))?;

        let mut visited = 0;
        while let Some(row) = rows.next().map_err(|e| StreamError::Store(e.into()))? {
            let mut out = Row::new();
            for (i, name) in names.iter().enumerate() {
                let value = row.get_ref(i).map_err(|e| StreamError::Store(e.into()))?;
                out.push(name.clone(), sql::from_sql(value));
            }
            visited += 1;
            visit(out).map_err(StreamError::Visitor)?;
        }

        Ok(visited)
    }
}

impl ScopeDirectory for SqliteStore {
    type Error = StoreError;

    fn scope_id(&self, code: &str) -> Result<Option<i64>, Self::Error> {
        let sql = format!("SELECT store_id FROM \"{}\" WHERE code = ?1", self.table("store"));
        let id = self
            .conn
            .query_row(&sql, params![code], |row| row.get(0))
            .optional()?;
        Ok(id)
    }
}

impl AttributeDirectory for SqliteStore {
    type Error = StoreError;

    fn attribute_id(&self, entity_type_code: &str, code: &str) -> Result<Option<i64>, Self::Error> {
        let sql = format!(
            "SELECT a.attribute_id FROM \"{}\" a
             JOIN \"{}\" t ON t.entity_type_id = a.entity_type_id
             WHERE t.entity_type_code = ?1 AND a.attribute_code = ?2",
            self.table("eav_attribute"),
            self.table("eav_entity_type")
        );
        let id = self
            .conn
            .query_row(&sql, params![entity_type_code, code], |row| row.get(0))
            .optional()?;
        Ok(id)
    }
}
