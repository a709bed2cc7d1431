//! Shared fixtures for the sweep integration tests

#![allow(dead_code)]

use eavclean_domain::{ScopeDirectory, SystemDefaults, Value};
use eavclean_store::{SqliteStore, StoreError};
use std::cell::Cell;
use std::collections::HashMap;

/// Entity types, scopes and attributes shared by every fixture
const REGISTRY: &str = "
    INSERT INTO eav_entity_type (entity_type_id, entity_type_code) VALUES
        (1, 'customer'), (2, 'customer_address'), (3, 'catalog_category'), (4, 'catalog_product');
    INSERT INTO store (store_id, code) VALUES (0, 'admin'), (1, 'default'), (2, 'french'), (3, 'german');
    INSERT INTO eav_attribute (attribute_id, entity_type_id, attribute_code, backend_type, is_user_defined) VALUES
        (45, 3, 'name', 'varchar', 0),
        (73, 4, 'name', 'varchar', 0),
        (93, 4, 'color', 'int', 1),
        (94, 4, 'legacy_label', 'varchar', 1),
        (95, 4, 'care_notes', 'text', 1),
        (96, 4, 'sku', 'static', 1),
        (97, 4, 'material', 'varchar', 1);
    INSERT INTO eav_entity_attribute (entity_type_id, attribute_set_id, attribute_group_id, attribute_id) VALUES
        (4, 4, 7, 73),
        (4, 4, 7, 93),
        (4, 4, 7, 94),
        (4, 4, 7, 97);
";

/// In-memory store with the shared registry
pub fn store() -> SqliteStore {
    let store = SqliteStore::new(":memory:").unwrap();
    exec(&store, REGISTRY);
    store
}

/// Run a batch of SQL against the fixture
pub fn exec(store: &SqliteStore, sql: &str) {
    store.connection().execute_batch(sql).unwrap();
}

/// `SELECT COUNT(*)` with an optional WHERE clause
pub fn rows(store: &SqliteStore, table: &str, filter: &str) -> i64 {
    let sql = if filter.is_empty() {
        format!("SELECT COUNT(*) FROM {}", table)
    } else {
        format!("SELECT COUNT(*) FROM {} WHERE {}", table, filter)
    };
    store.connection().query_row(&sql, [], |row| row.get(0)).unwrap()
}

/// Whether a value row still exists
pub fn exists(store: &SqliteStore, table: &str, value_id: i64) -> bool {
    rows(store, table, &format!("value_id = {}", value_id)) == 1
}

/// Row counts of every table the sweeps touch, for before/after comparison
pub fn snapshot(store: &SqliteStore) -> Vec<(String, i64)> {
    let mut tables = vec![
        "eav_attribute".to_string(),
        "core_config_data".to_string(),
    ];
    for entity in ["catalog_product", "catalog_category", "customer", "customer_address"] {
        for backend in ["varchar", "int", "decimal", "text", "datetime"] {
            tables.push(format!("{}_entity_{}", entity, backend));
        }
    }
    tables
        .into_iter()
        .map(|t| {
            let n = rows(store, &t, "");
            (t, n)
        })
        .collect()
}

/// System defaults backed by a map
#[derive(Default)]
pub struct MapDefaults(pub HashMap<String, Value>);

impl MapDefaults {
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.0.insert(path.to_string(), value.into());
        self
    }
}

impl SystemDefaults for MapDefaults {
    fn lookup(&self, path: &str) -> Option<Value> {
        self.0.get(path).cloned()
    }
}

/// Scope directory that counts lookups before delegating to the store
pub struct CountingScopes<'a> {
    pub inner: &'a SqliteStore,
    pub lookups: Cell<usize>,
}

impl<'a> CountingScopes<'a> {
    pub fn new(inner: &'a SqliteStore) -> Self {
        Self {
            inner,
            lookups: Cell::new(0),
        }
    }
}

impl ScopeDirectory for CountingScopes<'_> {
    type Error = StoreError;

    fn scope_id(&self, code: &str) -> Result<Option<i64>, Self::Error> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.scope_id(code)
    }
}
