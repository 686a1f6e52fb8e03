//! Domain types for jobs and their lifecycle.

mod duration;
mod error;
mod ids;
mod job;
mod kinds;
mod status;

pub use duration::EstimatedDuration;
pub use error::{
    JobDomainError, ParseJobPriorityError, ParseJobStatusError, ParseServiceTypeError,
};
pub use ids::JobId;
pub use job::{Job, JobName, NewJobData, PersistedJobData};
pub use kinds::{JobPriority, ServiceType};
pub use status::JobStatus;
