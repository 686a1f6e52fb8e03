//! Repository port for job persistence, lookup, and dispatch queries.

use crate::identity::domain::UserId;
use crate::job::domain::{Job, JobId, JobStatus};
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job repository operations.
pub type JobRepositoryResult<T> = Result<T, JobRepositoryError>;

/// Job persistence contract.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a new job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::DuplicateJob`] when the job ID already
    /// exists.
    async fn store(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Persists changes to an existing job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::NotFound`] when the job does not exist.
    async fn update(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Finds a job by identifier.
    ///
    /// Returns `None` when the job does not exist.
    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>>;

    /// Lists jobs ordered by `(scheduled_date, id)` for stable pagination.
    async fn list(&self, page: PageRequest) -> JobRepositoryResult<Page<Job>>;

    /// Lists jobs in a given status, ordered by `(scheduled_date, id)`.
    async fn list_by_status(
        &self,
        status: JobStatus,
        page: PageRequest,
    ) -> JobRepositoryResult<Page<Job>>;

    /// Returns all pending jobs scheduled for the given date; the dispatch
    /// collector's job source.
    async fn find_schedulable_for(&self, date: NaiveDate) -> JobRepositoryResult<Vec<Job>>;

    /// Returns all jobs assigned to a technician on the given date.
    async fn find_by_technician_on(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> JobRepositoryResult<Vec<Job>>;
}

/// Errors returned by job repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRepositoryError {
    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// The job was not found.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
