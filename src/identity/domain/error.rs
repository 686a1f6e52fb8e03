//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The display name exceeds the storage limit.
    #[error("display name '{0}' exceeds 120 characters")]
    DisplayNameTooLong(String),

    /// The email address is empty after trimming.
    #[error("email address must not be empty")]
    EmptyEmail,

    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The email address exceeds the storage limit.
    #[error("email address '{0}' exceeds 254 characters")]
    EmailTooLong(String),

    /// The skill tag is empty after trimming.
    #[error("skill tag must not be empty")]
    EmptySkillTag,

    /// The skill tag contains characters outside `[a-z0-9_]`.
    #[error("invalid skill tag '{0}', expected lowercase letters, digits, and underscores")]
    InvalidSkillTag(String),

    /// The skill tag exceeds the storage limit.
    #[error("skill tag '{0}' exceeds 50 characters")]
    SkillTagTooLong(String),

    /// The password is shorter than the minimum length.
    #[error("password must be at least 8 characters")]
    PasswordTooShort,

    /// The password exceeds the bcrypt input limit.
    #[error("password must be at most 72 bytes")]
    PasswordTooLong,

    /// The hashing backend failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Error returned while parsing user roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseRoleError(pub String);

/// Error returned while parsing account statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown account status: {0}")]
pub struct ParseAccountStatusError(pub String);
