//! Service type and priority classifications for jobs.

use super::{ParseJobPriorityError, ParseServiceTypeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of field work a job represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Initial installation at a new account.
    NewAccount,
    /// Replacement of existing equipment.
    Replacement,
    /// On-site customer training.
    Training,
    /// Scheduled or corrective maintenance.
    Maintenance,
}

impl ServiceType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewAccount => "new_account",
            Self::Replacement => "replacement",
            Self::Training => "training",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceType {
    type Error = ParseServiceTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new_account" => Ok(Self::NewAccount),
            "replacement" => Ok(Self::Replacement),
            "training" => Ok(Self::Training),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(ParseServiceTypeError(value.to_owned())),
        }
    }
}

/// Scheduling priority of a job.
///
/// Ordered so that `Low < Medium < High`; the assignment engine places
/// higher priorities first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    /// Schedule when capacity allows.
    Low,
    /// Default priority.
    Medium,
    /// Schedule ahead of other work.
    High,
}

impl JobPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobPriority {
    type Error = ParseJobPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseJobPriorityError(value.to_owned())),
        }
    }
}
