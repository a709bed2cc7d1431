//! Scoped-value reconciliation against a SQLite fixture

mod common;

use common::{exec, exists, rows};
use eavclean_domain::EntityKind;
use eavclean_janitor::{
    resolve_attribute_filter, resolve_scope_filter, Janitor, JanitorConfig, ScopedValueTarget,
};
use eavclean_store::SqliteStore;

const VARCHAR: &str = "catalog_product_entity_varchar";
const INT: &str = "catalog_product_entity_int";

fn fixture() -> SqliteStore {
    let store = common::store();
    exec(
        &store,
        "INSERT INTO catalog_product_entity_varchar (value_id, attribute_id, store_id, entity_id, row_id, value) VALUES
             (1, 73, 0, 10, 510, 'red'),
             (2, 73, 2, 10, 510, 'red'),
             (3, 73, 0, 11, 511, 'red'),
             (4, 73, 2, 11, 511, 'blue'),
             (5, 73, 0, 12, 512, 'red'),
             (6, 73, 2, 12, 512, NULL),
             (7, 73, 0, 13, 513, 'Red'),
             (8, 73, 1, 13, 513, 'red'),
             (9, 73, 3, 14, 514, 'no default'),
             (10, 97, 0, 10, 510, 'cotton'),
             (11, 97, 1, 10, 510, 'cotton');
         INSERT INTO catalog_product_entity_int (value_id, attribute_id, store_id, entity_id, row_id, value) VALUES
             (1, 93, 0, 10, 510, 5),
             (2, 93, 2, 10, 510, 5),
             (3, 93, 1, 11, 511, 7);",
    );
    store
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_equal_override_removed_different_kept_null_removed() {
    let store = fixture();
    let mut janitor = Janitor::default_config();

    let report = janitor
        .restore_scoped_defaults(&store, &ScopedValueTarget::new(EntityKind::Product))
        .unwrap();

    assert!(!exists(&store, VARCHAR, 2), "override equal to default is removed");
    assert!(exists(&store, VARCHAR, 4), "override differing from default is kept");
    assert!(!exists(&store, VARCHAR, 6), "NULL override is removed");
    assert!(exists(&store, VARCHAR, 8), "comparison is case-sensitive");
    assert!(exists(&store, VARCHAR, 9), "override without default is kept");
    assert!(!exists(&store, VARCHAR, 11));
    assert!(!exists(&store, INT, 2));
    assert!(exists(&store, INT, 3));

    assert_eq!(report.removed_per_attribute.get(&73), Some(&1));
    assert_eq!(report.removed_per_attribute.get(&93), Some(&1));
    assert_eq!(report.removed_per_attribute.get(&97), Some(&1));
    assert_eq!(report.total_null(), 1);
    assert_eq!(report.total(), 4);
    assert!(report.anomalies.is_empty());

    // Defaults are never touched
    assert_eq!(rows(&store, VARCHAR, "store_id = 0"), 5);
    assert_eq!(rows(&store, INT, "store_id = 0"), 1);
}

#[test]
fn test_always_restore_removes_differing_overrides() {
    let store = fixture();
    let mut janitor = Janitor::default_config();
    let mut target = ScopedValueTarget::new(EntityKind::Product);
    target.always_restore = true;

    let report = janitor.restore_scoped_defaults(&store, &target).unwrap();

    assert!(!exists(&store, VARCHAR, 4), "blue override is removed");
    assert!(!exists(&store, VARCHAR, 8));
    assert!(exists(&store, VARCHAR, 9), "an override needs a default to be restored to");
    assert!(exists(&store, INT, 3));
    assert_eq!(report.removed_per_attribute.get(&73), Some(&3));
    assert!(report.always_restore);
}

#[test]
fn test_scope_filter_limits_overrides() {
    let store = fixture();
    let mut janitor = Janitor::default_config();
    let french = codes(&["french"]);
    let mut target = ScopedValueTarget::new(EntityKind::Product);
    target.scopes = resolve_scope_filter(&store, Some(french.as_slice())).unwrap();

    let report = janitor.restore_scoped_defaults(&store, &target).unwrap();

    assert!(!exists(&store, VARCHAR, 2));
    assert!(!exists(&store, VARCHAR, 6));
    assert!(!exists(&store, INT, 2));
    assert!(exists(&store, VARCHAR, 11), "store 1 is outside the filter");
    assert_eq!(report.total(), 3);
}

#[test]
fn test_include_and_exclude_same_attribute_touches_nothing() {
    let store = fixture();
    let before = common::snapshot(&store);
    let mut janitor = Janitor::default_config();
    let name = codes(&["name"]);
    let mut target = ScopedValueTarget::new(EntityKind::Product);
    target.attributes =
        resolve_attribute_filter(&store, EntityKind::Product, Some(name.as_slice()), Some(name.as_slice())).unwrap();
    target.always_restore = true;

    let report = janitor.restore_scoped_defaults(&store, &target).unwrap();

    assert_eq!(report.total(), 0);
    assert_eq!(common::snapshot(&store), before);
}

#[test]
fn test_include_filter() {
    let store = fixture();
    let mut janitor = Janitor::default_config();
    let color = codes(&["color"]);
    let mut target = ScopedValueTarget::new(EntityKind::Product);
    target.attributes = resolve_attribute_filter(&store, EntityKind::Product, Some(color.as_slice()), None).unwrap();

    let report = janitor.restore_scoped_defaults(&store, &target).unwrap();

    assert!(!exists(&store, INT, 2));
    assert!(exists(&store, VARCHAR, 2));
    assert!(exists(&store, VARCHAR, 6), "NULL overrides obey the attribute filter too");
    assert_eq!(report.total(), 1);
}

#[test]
fn test_multiple_defaults_are_reported_not_resolved() {
    let store = fixture();
    exec(
        &store,
        "INSERT INTO catalog_product_entity_varchar (value_id, attribute_id, store_id, entity_id, row_id, value) VALUES
             (20, 73, 0, 15, 515, 'x'),
             (21, 73, 0, 15, 515, 'x'),
             (22, 73, 2, 15, 515, 'x');",
    );
    let mut janitor = Janitor::default_config();

    let report = janitor
        .restore_scoped_defaults(&store, &ScopedValueTarget::new(EntityKind::Product))
        .unwrap();

    assert!(exists(&store, VARCHAR, 22));
    assert!(!exists(&store, VARCHAR, 2), "the sweep continues past the anomaly");
    assert_eq!(report.anomalies.len(), 1);
    let anomaly = &report.anomalies[0];
    assert_eq!(anomaly.attribute_id, 73);
    assert_eq!(anomaly.key, "15");
    assert_eq!(anomaly.override_value_id, 22);
    assert_eq!(anomaly.default_rows, 2);
    assert_eq!(janitor.metrics().anomalies, 1);
}

#[test]
fn test_row_versioned_owning_key() {
    let store = common::store();
    exec(
        &store,
        "INSERT INTO catalog_product_entity_varchar (value_id, attribute_id, store_id, entity_id, row_id, value) VALUES
             (1, 73, 0, 10, 500, 'red'),
             (2, 73, 2, 99, 500, 'red');",
    );

    let target = ScopedValueTarget::new(EntityKind::Product);

    let by_entity = Janitor::default_config()
        .restore_scoped_defaults(&store, &target)
        .unwrap();
    assert_eq!(by_entity.total(), 0);
    assert!(exists(&store, VARCHAR, 2));

    let by_row = Janitor::new(JanitorConfig::row_versioned())
        .restore_scoped_defaults(&store, &target)
        .unwrap();
    assert_eq!(by_row.total(), 1);
    assert!(!exists(&store, VARCHAR, 2));
}

#[test]
fn test_category_partitions_only() {
    let store = fixture();
    exec(
        &store,
        "INSERT INTO catalog_category_entity_varchar (value_id, attribute_id, store_id, entity_id, value) VALUES
             (1, 45, 0, 3, 'Men'),
             (2, 45, 1, 3, 'Men');",
    );
    let mut janitor = Janitor::default_config();

    let report = janitor
        .restore_scoped_defaults(&store, &ScopedValueTarget::new(EntityKind::Category))
        .unwrap();

    assert_eq!(report.entity_type, "catalog_category");
    assert_eq!(report.total(), 1);
    assert!(exists(&store, VARCHAR, 2), "product partitions are not swept");
}

#[test]
fn test_non_utf8_text_compares_byte_exact() {
    let store = common::store();
    exec(
        &store,
        "INSERT INTO catalog_product_entity_text (value_id, attribute_id, store_id, entity_id, value) VALUES
             (1, 95, 0, 10, CAST(X'FF' AS TEXT)),
             (2, 95, 2, 10, CAST(X'FE' AS TEXT)),
             (3, 95, 1, 10, CAST(X'FF' AS TEXT));",
    );
    let mut janitor = Janitor::default_config();

    let report = janitor
        .restore_scoped_defaults(&store, &ScopedValueTarget::new(EntityKind::Product))
        .unwrap();

    let text = "catalog_product_entity_text";
    assert!(exists(&store, text, 2), "different bytes are a real override");
    assert!(!exists(&store, text, 3), "identical bytes are redundant");
    assert!(exists(&store, text, 1));
    assert_eq!(report.removed_per_attribute.get(&95), Some(&1));
}
