//! In-memory job repository for tests and headless composition.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::job::domain::{Job, JobId, JobStatus};
use crate::job::ports::{JobRepository, JobRepositoryError, JobRepositoryResult};
use crate::page::{Page, PageRequest};

/// Thread-safe in-memory job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    state: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> JobRepositoryError {
    JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn sorted_by_schedule(mut jobs: Vec<Job>) -> Vec<Job> {
    jobs.sort_by_key(|job| (job.scheduled_date(), job.id().into_inner()));
    jobs
}

fn page_of(jobs: Vec<Job>, page: PageRequest) -> Page<Job> {
    let total = jobs.len() as u64;
    let items = jobs
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.size() as usize)
        .collect();
    Page::new(items, total, page)
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        state.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.contains_key(&job.id()) {
            return Err(JobRepositoryError::NotFound(job.id()));
        }
        state.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> JobRepositoryResult<Page<Job>> {
        let state = self.state.read().map_err(poisoned)?;
        let jobs = sorted_by_schedule(state.values().cloned().collect());
        Ok(page_of(jobs, page))
    }

    async fn list_by_status(
        &self,
        status: JobStatus,
        page: PageRequest,
    ) -> JobRepositoryResult<Page<Job>> {
        let state = self.state.read().map_err(poisoned)?;
        let jobs = sorted_by_schedule(
            state
                .values()
                .filter(|job| job.status() == status)
                .cloned()
                .collect(),
        );
        Ok(page_of(jobs, page))
    }

    async fn find_schedulable_for(&self, date: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(sorted_by_schedule(
            state
                .values()
                .filter(|job| job.status() == JobStatus::Pending && job.scheduled_date() == date)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_technician_on(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> JobRepositoryResult<Vec<Job>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(sorted_by_schedule(
            state
                .values()
                .filter(|job| {
                    job.technician() == Some(technician) && job.scheduled_date() == date
                })
                .cloned()
                .collect(),
        ))
    }
}
