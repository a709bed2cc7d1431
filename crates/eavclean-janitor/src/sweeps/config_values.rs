//! Config-entry reconciliation
//!
//! For every distinct global `(path, value)` pair: non-global rows holding
//! the byte-identical value are redundant copies, and a global row equal to
//! the compiled-in system default carries no information. NULL is compared
//! as NULL throughout, and a path with no system default counts as a NULL
//! default.

use super::{CONFIG_SCOPE_COLUMN, CONFIG_TABLE};
use crate::config::JanitorConfig;
use crate::error::{store_error, JanitorError};
use crate::report::{ConfigAction, ConfigActionKind, ConfigReport};
use crate::walker::Walker;
use eavclean_domain::{Predicate, Row, Select, SystemDefaults, TabularStore, Value, GLOBAL_SCOPE};
use std::fmt::Display;

/// Rows holding exactly `value` at `path`, in any scope
fn same_pair(path: &str, value: &Value) -> Predicate {
    Predicate::eq("path", path).and(Predicate::binary_eq("value", value.clone()))
}

/// Reconcile configuration rows against their global and system defaults
pub fn run<S, D>(store: &S, config: &JanitorConfig, defaults: &D) -> Result<ConfigReport, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
    D: SystemDefaults + ?Sized,
{
    let walker = Walker::new(store, config.max_walk_depth);
    let table = store.table(CONFIG_TABLE);
    let pairs = Select::from(table.as_str())
        .columns(&["path", "value"])
        .distinct()
        .filter(Predicate::eq(CONFIG_SCOPE_COLUMN, GLOBAL_SCOPE));

    let mut report = ConfigReport {
        dry_run: config.dry_run,
        ..ConfigReport::default()
    };

    walker.walk_with(&pairs, &mut report, |row: &Row, report: &mut ConfigReport| {
        let path = row
            .get_text("path")
            .ok_or_else(|| JanitorError::InvalidRow("config row without path".to_string()))?;
        let value = row.get("value").cloned().unwrap_or(Value::Null);
        let same = same_pair(path, &value);
        let shown = if value.is_null() { None } else { Some(value.to_string()) };

        if store.count(&table, &same).map_err(store_error)? > 1 {
            let copies = same.clone().and(Predicate::ne(CONFIG_SCOPE_COLUMN, GLOBAL_SCOPE));
            let count = store.count(&table, &copies).map_err(store_error)?;
            if count > 0 {
                if config.dry_run {
                    tracing::info!("DRY RUN: Would remove {} copies of {}", count, path);
                } else {
                    store.delete(&table, &copies).map_err(store_error)?;
                    tracing::info!("Removed {} copies of {}", count, path);
                }
                report.record(ConfigAction {
                    path: path.to_string(),
                    value: shown.clone(),
                    kind: ConfigActionKind::DuplicatesCollapsed { count },
                });
            }
        }

        // A path without a system default defaults to NULL
        let matches_default = match defaults.lookup(path) {
            Some(default) => default.binary_eq(&value),
            None => value.is_null(),
        };
        if matches_default {
            let global = same.and(Predicate::eq(CONFIG_SCOPE_COLUMN, GLOBAL_SCOPE));
            let count = if config.dry_run {
                let count = store.count(&table, &global).map_err(store_error)?;
                tracing::info!("DRY RUN: Would remove {} (equals system default)", path);
                count
            } else {
                let count = store.delete(&table, &global).map_err(store_error)?;
                tracing::info!("Removed {} (equals system default)", path);
                count
            };
            report.record(ConfigAction {
                path: path.to_string(),
                value: shown,
                kind: ConfigActionKind::MatchesSystemDefault { count },
            });
        }

        Ok(())
    })?;

    Ok(report)
}
