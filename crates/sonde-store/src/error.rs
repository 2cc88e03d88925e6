//! Error types for sonde-store.
//!
//! The variants here *are* the audit signal: a `PermissionDenied` from the
//! store is an expected, successful probe observation, not a system error.
//! `Transient` exists so network failures are never conflated with policy
//! denials.

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors the backing store can return for a single operation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The store rejected the operation under access policy.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The target document is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store rejected the payload or path as malformed.
    #[error("validation rejected: {0}")]
    Validation(String),

    /// Network error, timeout, or server-side failure. Carries no policy
    /// signal; callers must not treat it as a denial.
    #[error("transient failure: {0}")]
    Transient(String),
}

impl StoreError {
    /// Whether this error is network/timeout shaped rather than a policy
    /// or addressing outcome.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    /// The diagnostic string, without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            StoreError::PermissionDenied(detail)
            | StoreError::NotFound(detail)
            | StoreError::Validation(detail)
            | StoreError::Transient(detail) => detail,
        }
    }
}
