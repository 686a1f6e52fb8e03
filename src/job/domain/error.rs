//! Error types for job domain validation and parsing.

use super::{JobId, JobStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain job values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The job name is empty after trimming.
    #[error("job name must not be empty")]
    EmptyJobName,

    /// The job name exceeds the storage limit.
    #[error("job name '{0}' exceeds 200 characters")]
    JobNameTooLong(String),

    /// The estimated duration is outside the accepted range.
    #[error("invalid estimated duration {0} minutes, expected 1..=960")]
    InvalidDuration(u32),

    /// The requested status change is not in the lifecycle transition table.
    #[error("invalid state transition for job {job_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// The job being transitioned.
        job_id: JobId,
        /// The current status.
        from: JobStatus,
        /// The rejected target status.
        to: JobStatus,
    },

    /// A mutation was attempted on a job in a terminal status.
    #[error("job {job_id} is {status} and can no longer be modified")]
    ModifyTerminalJob {
        /// The job being mutated.
        job_id: JobId,
        /// The terminal status it is in.
        status: JobStatus,
    },
}

/// Error returned while parsing job statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

/// Error returned while parsing service types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service type: {0}")]
pub struct ParseServiceTypeError(pub String);

/// Error returned while parsing job priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job priority: {0}")]
pub struct ParseJobPriorityError(pub String);
