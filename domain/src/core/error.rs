//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are raised by pure operations (parsing, lookups, registry
/// construction) before anything is sent or written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid format: {0}. Expected format: provider:model")]
    InvalidFormat(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unsupported provider: {0}")]
    UnknownProvider(String),

    #[error("Provider name or alias registered twice: {0}")]
    DuplicateProvider(String),
}

impl DomainError {
    /// Check if this error comes from a malformed model specifier
    pub fn is_format(&self) -> bool {
        matches!(self, DomainError::InvalidFormat(_))
    }
}
