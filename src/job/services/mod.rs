//! Orchestration services for the job context.

mod lifecycle;

pub use lifecycle::{
    JobLifecycleService, JobServiceError, JobServiceResult, ScheduleJobRequest,
};
