//! Password hashing and verification.

use super::IdentityDomainError;
use std::fmt;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Bcrypt truncates input beyond 72 bytes; reject rather than truncate.
const MAX_PASSWORD_BYTES: usize = 72;

/// A bcrypt password digest.
///
/// The digest never appears in `Debug` output so that accidentally logged
/// aggregates do not leak credential material.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes a plaintext password with the default bcrypt cost.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::PasswordTooShort`] or
    /// [`IdentityDomainError::PasswordTooLong`] when the plaintext violates
    /// the length policy, or [`IdentityDomainError::Hashing`] when the
    /// bcrypt backend fails.
    pub fn from_plaintext(plaintext: &str) -> Result<Self, IdentityDomainError> {
        if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityDomainError::PasswordTooShort);
        }
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(IdentityDomainError::PasswordTooLong);
        }

        let digest = bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
            .map_err(|err| IdentityDomainError::Hashing(err.to_string()))?;
        Ok(Self(digest))
    }

    /// Reconstructs a hash from its persisted digest.
    #[must_use]
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Verifies a candidate plaintext against this digest.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::Hashing`] when the stored digest is
    /// malformed.
    pub fn verify(&self, candidate: &str) -> Result<bool, IdentityDomainError> {
        bcrypt::verify(candidate, &self.0)
            .map_err(|err| IdentityDomainError::Hashing(err.to_string()))
    }

    /// Returns the digest for persistence.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}
