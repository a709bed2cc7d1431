//! The four database sweeps
//!
//! Each sweep is a free function over an opaque [`TabularStore`]; the
//! [`Janitor`](crate::Janitor) wraps them with metrics and timing.

pub mod config_values;
pub mod orphan_values;
pub mod scoped_values;
pub mod unused_attributes;

use crate::error::JanitorError;
use crate::walker::Walker;
use eavclean_domain::{EntityTypeCode, Predicate, Row, Select, TabularStore};
use std::fmt::Display;

/// Entity type registry table
pub(crate) const ENTITY_TYPE_TABLE: &str = "eav_entity_type";

/// Attribute definition table
pub(crate) const ATTRIBUTE_TABLE: &str = "eav_attribute";

/// Attribute set assignment table
pub(crate) const ASSIGNMENT_TABLE: &str = "eav_entity_attribute";

/// Configuration table
pub(crate) const CONFIG_TABLE: &str = "core_config_data";

/// Scope column of the value partitions
pub(crate) const VALUE_SCOPE_COLUMN: &str = "store_id";

/// Scope column of the configuration table
pub(crate) const CONFIG_SCOPE_COLUMN: &str = "scope_id";

/// Identifier of a registered entity type, `None` when not registered
pub(crate) fn entity_type_id<S>(walker: &Walker<'_, S>, code: EntityTypeCode) -> Result<Option<i64>, JanitorError>
where
    S: TabularStore,
    S::Error: Display,
{
    let query = Select::from(walker.store().table(ENTITY_TYPE_TABLE))
        .columns(&["entity_type_id"])
        .filter(Predicate::eq("entity_type_code", code.as_str()));

    let mut found = None;
    walker.walk_with(&query, &mut found, |row: &Row, found: &mut Option<i64>| {
        if found.is_none() {
            *found = row.get_i64("entity_type_id");
        }
        Ok(())
    })?;
    Ok(found)
}

/// Integer column a sweep cannot do without
pub(crate) fn required_i64(row: &Row, column: &str) -> Result<i64, JanitorError> {
    row.get_i64(column)
        .ok_or_else(|| JanitorError::InvalidRow(format!("missing integer column `{}`", column)))
}
