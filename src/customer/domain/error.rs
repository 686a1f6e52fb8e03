//! Error types for customer domain validation.

use thiserror::Error;

/// Errors returned while constructing customer domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerDomainError {
    /// The customer name is empty after trimming.
    #[error("customer name must not be empty")]
    EmptyCustomerName,

    /// The customer name exceeds the storage limit.
    #[error("customer name '{0}' exceeds 200 characters")]
    CustomerNameTooLong(String),

    /// An address component is empty after trimming.
    #[error("address {0} must not be empty")]
    EmptyAddressComponent(&'static str),

    /// The postal code contains characters outside digits, letters, dashes,
    /// and spaces, or violates the length bounds.
    #[error("invalid postal code '{0}'")]
    InvalidPostalCode(String),
}
