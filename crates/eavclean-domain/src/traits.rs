//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the reconciliation engine and
//! infrastructure. Implementations live in other crates (eavclean-store) or in
//! test fixtures.

use crate::query::{Predicate, Select, Value};
use crate::row::Row;

/// Failure of a streamed read
///
/// Separates errors raised by the store itself from errors returned by the
/// row visitor, so neither has to know the other's error type.
#[derive(Debug)]
pub enum StreamError<S, V> {
    /// The store failed to prepare or step the query
    Store(S),
    /// The visitor aborted the stream
    Visitor(V),
}

/// Tabular store with select/count/delete/stream primitives
///
/// Implemented by the infrastructure layer (eavclean-store)
pub trait TabularStore {
    /// Error type for store operations
    type Error;

    /// Resolve a logical table name to its physical name (e.g. apply a prefix)
    fn table(&self, name: &str) -> String;

    /// Count rows of `table` matching `filter`
    fn count(&self, table: &str, filter: &Predicate) -> Result<u64, Self::Error>;

    /// Delete rows of `table` matching `filter`, returning the affected count
    fn delete(&self, table: &str, filter: &Predicate) -> Result<u64, Self::Error>;

    /// Stream the rows of `select` one at a time into `visit`
    ///
    /// Memory use must not grow with the size of the result set. Every call
    /// opens its own cursor, so `visit` may itself call `stream` (with a
    /// different query), `count` or `delete` before returning. Returns the
    /// number of rows visited.
    fn stream<V, F>(&self, select: &Select, visit: F) -> Result<u64, StreamError<Self::Error, V>>
    where
        F: FnMut(Row) -> Result<(), V>;
}

/// Directory of scopes (stores / sites) by code
pub trait ScopeDirectory {
    /// Error type for lookups
    type Error;

    /// Resolve a scope code to its identifier
    fn scope_id(&self, code: &str) -> Result<Option<i64>, Self::Error>;
}

/// Directory of attribute definitions by code
pub trait AttributeDirectory {
    /// Error type for lookups
    type Error;

    /// Resolve an attribute code within an entity type to its identifier
    fn attribute_id(&self, entity_type_code: &str, code: &str) -> Result<Option<i64>, Self::Error>;
}

/// Static tree of compiled-in configuration defaults
pub trait SystemDefaults {
    /// Look up a `/`-delimited configuration path
    ///
    /// `None` means no default exists for the path; `Some(Value::Null)` is an
    /// explicit NULL default.
    fn lookup(&self, path: &str) -> Option<Value>;
}
