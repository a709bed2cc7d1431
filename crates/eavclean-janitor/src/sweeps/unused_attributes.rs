//! Unused-attribute purge
//!
//! Removes user-defined product attributes that no value references, or that
//! have values but belong to no attribute set. Values left behind by the
//! second case are collected by the orphan-value purge.

use super::{entity_type_id, ASSIGNMENT_TABLE, ATTRIBUTE_TABLE};
use crate::config::JanitorConfig;
use crate::error::{store_error, JanitorError, ValidationError};
use crate::report::{RemovalReason, RemovedAttribute, UnusedAttributeReport};
use crate::walker::Walker;
use eavclean_domain::{AttributeDefinition, BackendType, EntityTypeCode, Predicate, Row, Select, TabularStore};
use std::fmt::Display;

/// Purge unused product attribute definitions
pub fn run<S>(store: &S, config: &JanitorConfig) -> Result<UnusedAttributeReport, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
{
    let walker = Walker::new(store, config.max_walk_depth);
    let product = EntityTypeCode::Product;
    let type_id = entity_type_id(&walker, product)?
        .ok_or_else(|| ValidationError::UnknownEntityType(product.as_str().to_string()))?;

    let attributes = store.table(ATTRIBUTE_TABLE);
    let assignments = store.table(ASSIGNMENT_TABLE);
    let candidates = Select::from(attributes.as_str())
        .columns(&AttributeDefinition::COLUMNS)
        .filter(Predicate::eq("entity_type_id", type_id))
        .filter(Predicate::eq("is_user_defined", 1))
        .filter(Predicate::ne("backend_type", BackendType::Static.as_str()));

    let mut report = UnusedAttributeReport {
        dry_run: config.dry_run,
        ..UnusedAttributeReport::default()
    };

    walker.walk_with(&candidates, &mut report, |row: &Row, report: &mut UnusedAttributeReport| {
        let definition = AttributeDefinition::from_row(row)
            .ok_or_else(|| JanitorError::InvalidRow("malformed attribute definition".to_string()))?;

        let Some(table) = definition
            .backend()
            .and_then(|backend| product.value_table(backend))
            .map(|logical| store.table(&logical))
        else {
            tracing::warn!(
                attribute = %definition.code,
                backend_type = %definition.backend_type,
                "Unknown backend type, skipping attribute"
            );
            report.skipped.push(definition.code);
            return Ok(());
        };

        let referenced = Predicate::eq("attribute_id", definition.attribute_id);
        let value_count = store.count(&table, &referenced).map_err(store_error)?;

        let (reason, assignment_count) = if value_count == 0 {
            (RemovalReason::NoValues, None)
        } else {
            let assigned = store.count(&assignments, &referenced).map_err(store_error)?;
            if assigned > 0 {
                tracing::debug!(attribute = %definition.code, value_count, assigned, "Attribute in use");
                return Ok(());
            }
            (RemovalReason::NotAssigned, Some(assigned))
        };

        if config.dry_run {
            tracing::info!("DRY RUN: Would remove attribute {} ({})", definition.code, reason.as_str());
        } else {
            store.delete(&attributes, &referenced).map_err(store_error)?;
            tracing::info!("Removed attribute {} ({})", definition.code, reason.as_str());
        }

        report.removed.push(RemovedAttribute {
            attribute_id: definition.attribute_id,
            code: definition.code,
            backend_type: definition.backend_type,
            value_count,
            assignment_count,
            reason,
        });
        Ok(())
    })?;

    Ok(report)
}
