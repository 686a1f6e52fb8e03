//! Job lifecycle status and its transition table.

use super::ParseJobStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job lifecycle status.
///
/// Jobs are never hard-deleted; cancellation is the soft terminal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Scheduled but not yet started.
    Pending,
    /// A technician is working the job.
    InProgress,
    /// The work is finished.
    Completed,
    /// The job was called off.
    Cancelled,
}

impl JobStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` when the lifecycle permits moving to `target`.
    ///
    /// Pending work can start or be called off; started work can complete,
    /// be called off, or fall back to pending when a visit is abandoned
    /// mid-day. Completed and cancelled are terminal.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::InProgress | Self::Cancelled)
                | (
                    Self::InProgress,
                    Self::Pending | Self::Completed | Self::Cancelled
                )
        )
    }

    /// Returns `true` when no further transitions are permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}
