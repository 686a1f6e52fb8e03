//! Validated estimated service duration.

use super::JobDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest plausible single-visit duration: a sixteen-hour double shift.
const MAX_DURATION_MINUTES: u32 = 960;

/// Estimated on-site duration of a job in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstimatedDuration(u32);

impl EstimatedDuration {
    /// Creates a validated duration.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidDuration`] when the value is zero or
    /// exceeds 960 minutes.
    pub const fn from_minutes(minutes: u32) -> Result<Self, JobDomainError> {
        if minutes == 0 || minutes > MAX_DURATION_MINUTES {
            return Err(JobDomainError::InvalidDuration(minutes));
        }
        Ok(Self(minutes))
    }

    /// Returns the duration in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EstimatedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.0)
    }
}
