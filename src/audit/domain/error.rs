//! Error types for audit domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing audit domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditDomainError {
    /// The action name is empty after trimming.
    #[error("action name must not be empty")]
    EmptyActionName,

    /// The action name contains characters outside `[a-z0-9_.]`.
    #[error("invalid action name '{0}', expected dotted lowercase like 'job.create'")]
    InvalidActionName(String),

    /// The action name exceeds the storage limit.
    #[error("action name '{0}' exceeds 100 characters")]
    ActionNameTooLong(String),
}

/// Error returned while parsing resource kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown resource kind: {0}")]
pub struct ParseResourceKindError(pub String);
