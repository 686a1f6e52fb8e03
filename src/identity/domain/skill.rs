//! Validated technician skill tags.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a skill tag, matching the persisted payload limit.
const MAX_SKILL_LENGTH: usize = 50;

/// Validated, lowercase skill identifier (e.g. `hvac`, `fiber_splicing`).
///
/// Skill tags connect a technician's capabilities to a job's requirements
/// during assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTag(String);

impl SkillTag {
    /// Creates a validated skill tag.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptySkillTag`] when the value is
    /// empty after trimming, [`IdentityDomainError::SkillTagTooLong`] when
    /// it exceeds 50 characters, or [`IdentityDomainError::InvalidSkillTag`]
    /// when it contains other characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptySkillTag);
        }
        if normalized.len() > MAX_SKILL_LENGTH {
            return Err(IdentityDomainError::SkillTagTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if !is_valid {
            return Err(IdentityDomainError::InvalidSkillTag(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the skill tag as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SkillTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SkillTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
