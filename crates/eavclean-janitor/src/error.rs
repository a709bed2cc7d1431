//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Rejected input; raised before any mutation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Walker misuse (nesting too deep, re-entrant cursor)
    #[error("Walk error: {0}")]
    Walk(String),

    /// A streamed row is missing a column the sweep relies on
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error that prevents a media sweep from starting
    #[error("Filesystem error: {0}")]
    Filesystem(String),
}

impl JanitorError {
    /// Whether this error was raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, JanitorError::Validation(_))
    }
}

/// Input that cannot be turned into a sweep target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The global scope was named as if it were an override scope
    #[error("Admin values can not be removed!")]
    ForbiddenScope,

    /// A scope code did not resolve
    #[error("Store with code `{code}` does not exist")]
    UnknownScope {
        /// Offending code
        code: String,
    },

    /// An attribute code did not resolve within its entity type
    #[error("Attribute with code `{code}` does not exist for entity type `{entity_type}`")]
    UnknownAttribute {
        /// Entity type the code was resolved against
        entity_type: String,
        /// Offending code
        code: String,
    },

    /// Entity kind other than product or category
    #[error("Invalid entity `{0}`. Possible options are product or category")]
    InvalidEntityKind(String),

    /// Entity type not registered in the store
    #[error("Entity type `{0}` is not registered")]
    UnknownEntityType(String),
}

/// Stringify a store failure at the engine boundary
pub(crate) fn store_error<E: std::fmt::Display>(e: E) -> JanitorError {
    JanitorError::Store(e.to_string())
}
