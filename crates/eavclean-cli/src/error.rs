//! Error types for the CLI application.

use eavclean_janitor::{JanitorError, ValidationError};
use eavclean_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine error
    #[error(transparent)]
    Janitor(#[from] JanitorError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// The confirmation gate refused to run
    #[error("{0}")]
    Aborted(String),
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        CliError::Janitor(e.into())
    }
}

impl CliError {
    /// Process exit code for this error
    ///
    /// Validation failures exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Janitor(e) if e.is_validation() => 2,
            CliError::InvalidInput(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(ValidationError::ForbiddenScope).exit_code(), 2);
        assert_eq!(CliError::InvalidInput("no media root".into()).exit_code(), 2);
        assert_eq!(CliError::Aborted("aborted by user".into()).exit_code(), 1);
        assert_eq!(
            CliError::Janitor(JanitorError::Store("disk I/O error".into())).exit_code(),
            1
        );
    }

    #[test]
    fn test_validation_message_is_not_wrapped() {
        let err = CliError::from(ValidationError::UnknownScope {
            code: "klingon".to_string(),
        });
        let expected = JanitorError::from(ValidationError::UnknownScope {
            code: "klingon".to_string(),
        })
        .to_string();
        assert_eq!(err.to_string(), expected);
    }
}
