//! Validated email address type.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an email address, matching the `VARCHAR(254)` column.
const MAX_EMAIL_LENGTH: usize = 254;

/// Validated, lowercase-normalized email address.
///
/// Validation is deliberately shallow: one `@`, a non-empty local part, and
/// a dotted domain. Deliverability is the mail system's problem, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// The input is trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyEmail`] when the value is empty
    /// after trimming, [`IdentityDomainError::EmailTooLong`] when it exceeds
    /// 254 characters, or [`IdentityDomainError::InvalidEmail`] when the
    /// shape is not `local@domain.tld`.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptyEmail);
        }
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(IdentityDomainError::EmailTooLong(raw));
        }

        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let has_more_parts = parts.next().is_some();

        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && !has_more_parts
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the email address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
