//! Scoped-value reconciliation
//!
//! Removes override rows (`store_id <> 0`) that add nothing over the global
//! default of the same attribute and owning key:
//!
//! - a non-NULL override whose single default is byte-identical (or any
//!   override with a single default, when `always_restore` is set)
//! - every NULL override
//!
//! Overrides are streamed; each one looks up its default with a nested walk.
//! A key with more than one default row is an integrity anomaly: the override
//! is left alone and reported.

use super::{required_i64, VALUE_SCOPE_COLUMN};
use crate::config::JanitorConfig;
use crate::error::{store_error, JanitorError};
use crate::filter::{AttributeFilter, ScopeFilter};
use crate::report::{IntegrityAnomaly, PartitionCount, ScopedValueReport};
use crate::walker::Walker;
use eavclean_domain::{BackendType, EntityKind, Predicate, Row, Select, TabularStore, Value, GLOBAL_SCOPE};
use std::fmt::Display;

/// What to reconcile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedValueTarget {
    /// Entity kind whose partitions are swept
    pub kind: EntityKind,
    /// Eligible override scopes
    pub scopes: ScopeFilter,
    /// Eligible attributes
    pub attributes: AttributeFilter,
    /// Remove overrides even when they differ from the default
    pub always_restore: bool,
}

impl ScopedValueTarget {
    /// Unrestricted target for `kind`
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            scopes: ScopeFilter::unrestricted(),
            attributes: AttributeFilter::unrestricted(),
            always_restore: false,
        }
    }

    /// Override rows eligible under both filters
    fn overrides(&self) -> Predicate {
        Predicate::ne(VALUE_SCOPE_COLUMN, GLOBAL_SCOPE)
            .and(self.scopes.predicate(VALUE_SCOPE_COLUMN))
            .and(self.attributes.predicate("attribute_id"))
    }
}

/// Reconcile the overrides of `target.kind` against their defaults
pub fn run<S>(store: &S, config: &JanitorConfig, target: &ScopedValueTarget) -> Result<ScopedValueReport, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
{
    let walker = Walker::new(store, config.max_walk_depth);
    let entity_type = target.kind.entity_type();
    let key = config.owning_key.column();

    let mut report = ScopedValueReport {
        dry_run: config.dry_run,
        entity_type: entity_type.as_str().to_string(),
        always_restore: target.always_restore,
        ..ScopedValueReport::default()
    };

    for backend in BackendType::PARTITIONED {
        let Some(logical) = entity_type.value_table(backend) else {
            continue;
        };
        let table = store.table(&logical);
        tracing::info!(table = %table, "Reconciling overrides");

        let overrides = Select::from(table.as_str())
            .columns(&["value_id", "attribute_id", key, "value"])
            .filter(target.overrides())
            .filter(Predicate::is_not_null("value"));

        walker.walk_with(&overrides, &mut report, |row: &Row, report: &mut ScopedValueReport| {
            let value_id = required_i64(row, "value_id")?;
            let attribute_id = required_i64(row, "attribute_id")?;
            let owner = row.get(key).cloned().unwrap_or(Value::Null);
            if owner.is_null() {
                tracing::debug!(value_id, key, "Override without owning key, skipping");
                return Ok(());
            }
            let value = row.get("value").cloned().unwrap_or(Value::Null);

            let defaults = Select::from(table.as_str())
                .columns(&["value_id", "value"])
                .filter(Predicate::eq("attribute_id", attribute_id))
                .filter(Predicate::eq(VALUE_SCOPE_COLUMN, GLOBAL_SCOPE))
                .filter(Predicate::eq(key, owner.clone()));

            let mut found: Vec<Value> = Vec::new();
            walker.walk_with(&defaults, &mut found, |row: &Row, found: &mut Vec<Value>| {
                found.push(row.get("value").cloned().unwrap_or(Value::Null));
                Ok(())
            })?;

            let redundant = match found.as_slice() {
                [] => false,
                [default] => target.always_restore || default.binary_eq(&value),
                many => {
                    tracing::warn!(
                        table = %table,
                        attribute_id,
                        key = %owner,
                        default_rows = many.len(),
                        "Multiple default rows, leaving override in place"
                    );
                    report.anomalies.push(IntegrityAnomaly {
                        table: table.clone(),
                        attribute_id,
                        key_column: key.to_string(),
                        key: owner.to_string(),
                        override_value_id: value_id,
                        default_rows: many.len(),
                    });
                    false
                }
            };
            if !redundant {
                return Ok(());
            }

            if config.dry_run {
                tracing::debug!(value_id, attribute_id, "DRY RUN: Would remove override");
            } else {
                store
                    .delete(&table, &Predicate::eq("value_id", value_id))
                    .map_err(store_error)?;
                tracing::debug!(value_id, attribute_id, "Removed override");
            }
            report.record_removed(attribute_id);
            Ok(())
        })?;

        let nulls = target.overrides().and(Predicate::is_null("value"));
        let count = store.count(&table, &nulls).map_err(store_error)?;
        if count > 0 {
            if config.dry_run {
                tracing::info!("DRY RUN: Would remove {} NULL overrides from {}", count, table);
            } else {
                store.delete(&table, &nulls).map_err(store_error)?;
                tracing::info!("Removed {} NULL overrides from {}", count, table);
            }
        }
        report.null_overrides.push(PartitionCount {
            entity_type: entity_type.as_str().to_string(),
            backend_type: backend.as_str().to_string(),
            table,
            count,
        });
    }

    Ok(report)
}
