//! eavclean Domain Layer
//!
//! This crate contains the domain model shared by the store adapter, the
//! reconciliation engine and the CLI. It has ZERO external dependencies and
//! defines the value objects and trait interfaces every other layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Entity type**: an EAV entity (`catalog_product`, `customer`, ...) whose
//!   attribute values are spread over per-backend-type partitions
//! - **Backend type**: the physical value partition (`varchar`, `int`, ...)
//! - **Scope**: `0` is the global default, anything else is an override
//! - **Query model**: [`Select`] and [`Predicate`] describe reads and deletes
//!   structurally; stores render them with bound parameters
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure implementations live in other crates
//! - Trait definitions for every external collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod entity;
pub mod query;
pub mod row;
pub mod traits;

// Re-exports for convenience
pub use attribute::AttributeDefinition;
pub use entity::{BackendType, EntityKind, EntityTypeCode};
pub use query::{Predicate, Select, Value};
pub use row::Row;
pub use traits::{AttributeDirectory, ScopeDirectory, StreamError, SystemDefaults, TabularStore};

/// Scope identifier of the global default
pub const GLOBAL_SCOPE: i64 = 0;
