//! Entity module - entity kinds, entity-type codes and value partitions

/// Entity kinds whose scoped values can be reconciled against their defaults
///
/// Only catalog entities carry per-store overrides:
/// - Product: `catalog_product_entity_*` partitions
/// - Category: `catalog_category_entity_*` partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Catalog products
    Product,

    /// Catalog categories
    Category,
}

impl EntityKind {
    /// Get the entity kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Category => "category",
        }
    }

    /// Parse an entity kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "product" => Some(EntityKind::Product),
            "category" => Some(EntityKind::Category),
            _ => None,
        }
    }

    /// The entity type this kind's attributes are registered under
    pub fn entity_type(&self) -> EntityTypeCode {
        match self {
            EntityKind::Product => EntityTypeCode::Product,
            EntityKind::Category => EntityTypeCode::Category,
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid entity kind: {}", s))
    }
}

/// EAV entity types covered by the orphan-value purge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTypeCode {
    /// `catalog_product`
    Product,

    /// `catalog_category`
    Category,

    /// `customer`
    Customer,

    /// `customer_address`
    CustomerAddress,
}

impl EntityTypeCode {
    /// Every entity type the orphan-value purge walks, in sweep order
    pub const ALL: [EntityTypeCode; 4] = [
        EntityTypeCode::Product,
        EntityTypeCode::Category,
        EntityTypeCode::Customer,
        EntityTypeCode::CustomerAddress,
    ];

    /// Code as registered in `eav_entity_type.entity_type_code`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTypeCode::Product => "catalog_product",
            EntityTypeCode::Category => "catalog_category",
            EntityTypeCode::Customer => "customer",
            EntityTypeCode::CustomerAddress => "customer_address",
        }
    }

    /// Parse an entity-type code
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == s)
    }

    /// Logical (unprefixed) name of the value partition for `backend`
    ///
    /// Returns `None` for [`BackendType::Static`], which has no partition.
    pub fn value_table(&self, backend: BackendType) -> Option<String> {
        if backend == BackendType::Static {
            return None;
        }
        Some(format!("{}_entity_{}", self.as_str(), backend.as_str()))
    }
}

impl std::fmt::Display for EntityTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical storage class of an attribute's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendType {
    /// Short strings
    Varchar,

    /// Integers and option ids
    Int,

    /// Fixed-point numbers
    Decimal,

    /// Long text
    Text,

    /// Timestamps
    Datetime,

    /// Stored on the entity row itself; no value partition
    Static,
}

impl BackendType {
    /// The backend types that own a value partition
    pub const PARTITIONED: [BackendType; 5] = [
        BackendType::Varchar,
        BackendType::Int,
        BackendType::Decimal,
        BackendType::Text,
        BackendType::Datetime,
    ];

    /// Name as stored in `eav_attribute.backend_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Varchar => "varchar",
            BackendType::Int => "int",
            BackendType::Decimal => "decimal",
            BackendType::Text => "text",
            BackendType::Datetime => "datetime",
            BackendType::Static => "static",
        }
    }

    /// Parse a backend type
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "varchar" => Some(BackendType::Varchar),
            "int" => Some(BackendType::Int),
            "decimal" => Some(BackendType::Decimal),
            "text" => Some(BackendType::Text),
            "datetime" => Some(BackendType::Datetime),
            "static" => Some(BackendType::Static),
            _ => None,
        }
    }

    /// Whether values of this type live in a separate partition
    pub fn is_partitioned(&self) -> bool {
        *self != BackendType::Static
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
