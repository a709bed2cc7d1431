//! Attribute module - attribute definitions as read from the store

use crate::entity::BackendType;
use crate::row::Row;

/// An attribute definition (`eav_attribute` row)
///
/// Owned by the attribute-management subsystem; the engine only reads and
/// deletes these.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    /// Attribute identifier
    pub attribute_id: i64,

    /// Attribute code, unique within its entity type
    pub code: String,

    /// Owning entity type
    pub entity_type_id: i64,

    /// Raw backend type as stored
    pub backend_type: String,

    /// Created by a user rather than by the platform
    pub is_user_defined: bool,
}

impl AttributeDefinition {
    /// Column names read by [`AttributeDefinition::from_row`]
    pub const COLUMNS: [&'static str; 5] = [
        "attribute_id",
        "attribute_code",
        "entity_type_id",
        "backend_type",
        "is_user_defined",
    ];

    /// Build a definition from a streamed `eav_attribute` row
    ///
    /// Returns `None` when a required column is missing or has the wrong type.
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            attribute_id: row.get_i64("attribute_id")?,
            code: row.get_text("attribute_code")?.to_string(),
            entity_type_id: row.get_i64("entity_type_id")?,
            backend_type: row.get_text("backend_type")?.to_string(),
            is_user_defined: row.get_i64("is_user_defined").unwrap_or(0) != 0,
        })
    }

    /// Parsed backend type, `None` when it is not one the engine knows
    pub fn backend(&self) -> Option<BackendType> {
        BackendType::parse(&self.backend_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row() {
        let row = Row::new()
            .with("attribute_id", 93)
            .with("attribute_code", "color")
            .with("entity_type_id", 4)
            .with("backend_type", "int")
            .with("is_user_defined", 1);

        let def = AttributeDefinition::from_row(&row).unwrap();
        assert_eq!(def.code, "color");
        assert_eq!(def.backend(), Some(BackendType::Int));
        assert!(def.is_user_defined);
    }

    #[test]
    fn test_from_row_missing_column() {
        let row = Row::new().with("attribute_id", 93);
        assert!(AttributeDefinition::from_row(&row).is_none());
    }
}
