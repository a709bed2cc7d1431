//! Orphan-value purge
//!
//! A value row is orphaned when no attribute definition of the partition's
//! entity type and backend type carries its `attribute_id`. Each partition is
//! classified with one anti-join; rows are never loaded.

use super::{entity_type_id, ATTRIBUTE_TABLE};
use crate::config::JanitorConfig;
use crate::error::{store_error, JanitorError};
use crate::report::{OrphanValueReport, PartitionCount};
use crate::walker::Walker;
use eavclean_domain::{BackendType, EntityTypeCode, Predicate, Select, TabularStore};
use std::fmt::Display;

/// Anti-join selecting the orphaned rows of one partition
pub fn orphan_predicate<S: TabularStore>(store: &S, entity_type_id: i64, backend: BackendType) -> Predicate {
    let definitions = Select::from(store.table(ATTRIBUTE_TABLE))
        .columns(&["attribute_id"])
        .filter(Predicate::eq("entity_type_id", entity_type_id))
        .filter(Predicate::eq("backend_type", backend.as_str()));
    Predicate::not_in_select("attribute_id", definitions)
}

/// Purge orphaned values from every covered partition
pub fn run<S>(store: &S, config: &JanitorConfig) -> Result<OrphanValueReport, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
{
    let walker = Walker::new(store, config.max_walk_depth);
    let mut report = OrphanValueReport {
        dry_run: config.dry_run,
        ..OrphanValueReport::default()
    };

    for code in EntityTypeCode::ALL {
        let Some(type_id) = entity_type_id(&walker, code)? else {
            tracing::warn!(entity_type = %code, "Entity type not registered, skipping");
            report.skipped_entity_types.push(code.as_str().to_string());
            continue;
        };

        for backend in BackendType::PARTITIONED {
            let Some(logical) = code.value_table(backend) else {
                continue;
            };
            let table = store.table(&logical);
            let orphaned = orphan_predicate(store, type_id, backend);

            let count = store.count(&table, &orphaned).map_err(store_error)?;
            if count > 0 {
                if config.dry_run {
                    tracing::info!("DRY RUN: Would remove {} orphaned rows from {}", count, table);
                } else {
                    let deleted = store.delete(&table, &orphaned).map_err(store_error)?;
                    tracing::info!("Removed {} orphaned rows from {}", deleted, table);
                }
            }

            report.partitions.push(PartitionCount {
                entity_type: code.as_str().to_string(),
                backend_type: backend.as_str().to_string(),
                table,
                count,
            });
        }
    }

    Ok(report)
}
