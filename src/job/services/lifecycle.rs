//! Service layer for job intake, assignment, and lifecycle transitions.

use crate::customer::domain::CustomerId;
use crate::customer::ports::{CustomerRepository, CustomerRepositoryError};
use crate::identity::domain::{AuthenticatedPrincipal, Permission, SkillTag, UserId, UserRole};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::job::domain::{
    EstimatedDuration, Job, JobDomainError, JobId, JobName, JobPriority, JobStatus, NewJobData,
    ServiceType,
};
use crate::job::ports::{JobRepository, JobRepositoryError};
use crate::page::{Page, PageRequest};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for scheduling a job.
#[derive(Debug, Clone)]
pub struct ScheduleJobRequest {
    name: String,
    description: Option<String>,
    customer_id: CustomerId,
    service_type: ServiceType,
    priority: JobPriority,
    scheduled_date: NaiveDate,
    estimated_minutes: u32,
    required_skills: Vec<String>,
}

impl ScheduleJobRequest {
    /// Creates a request with required job fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        customer_id: CustomerId,
        service_type: ServiceType,
        scheduled_date: NaiveDate,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            customer_id,
            service_type,
            priority: JobPriority::Medium,
            scheduled_date,
            estimated_minutes,
            required_skills: Vec::new(),
        }
    }

    /// Sets the free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the scheduling priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: JobPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the skills a technician needs to work this job.
    #[must_use]
    pub fn with_required_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.required_skills = skills.into_iter().collect();
        self
    }
}

/// Service-level errors for job lifecycle operations.
#[derive(Debug, Error)]
pub enum JobServiceError {
    /// The acting principal lacks the required permission.
    #[error("permission denied, requires {required}")]
    PermissionDenied {
        /// The permission the operation requires.
        required: Permission,
    },

    /// The referenced customer does not exist.
    #[error("unknown customer: {0}")]
    UnknownCustomer(CustomerId),

    /// The referenced user is not an active technician.
    #[error("user {0} is not an active technician")]
    NotAnActiveTechnician(UserId),

    /// A technician acted on a job not assigned to them.
    #[error("job {0} is not assigned to the acting technician")]
    NotAssignedToActor(JobId),

    /// Identity-side validation of skill tags failed.
    #[error(transparent)]
    Skill(#[from] crate::identity::domain::IdentityDomainError),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// Job repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),

    /// Customer repository operation failed.
    #[error(transparent)]
    Customers(#[from] CustomerRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

/// Result type for job lifecycle operations.
pub type JobServiceResult<T> = Result<T, JobServiceError>;

/// Job lifecycle orchestration service.
#[derive(Clone)]
pub struct JobLifecycleService<J, CU, U, C>
where
    J: JobRepository,
    CU: CustomerRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    jobs: Arc<J>,
    customers: Arc<CU>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<J, CU, U, C> JobLifecycleService<J, CU, U, C>
where
    J: JobRepository,
    CU: CustomerRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new job lifecycle service.
    #[must_use]
    pub const fn new(jobs: Arc<J>, customers: Arc<CU>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            jobs,
            customers,
            users,
            clock,
        }
    }

    /// Schedules a new pending job.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PermissionDenied`] unless the actor may
    /// manage jobs, [`JobServiceError::UnknownCustomer`] when the customer
    /// reference is dangling, and [`JobServiceError::Domain`] when
    /// validation fails.
    pub async fn schedule(
        &self,
        actor: &AuthenticatedPrincipal,
        request: ScheduleJobRequest,
    ) -> JobServiceResult<Job> {
        require(actor, Permission::ManageJobs)?;

        let ScheduleJobRequest {
            name,
            description,
            customer_id,
            service_type,
            priority,
            scheduled_date,
            estimated_minutes,
            required_skills,
        } = request;

        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(JobServiceError::UnknownCustomer(customer_id));
        }

        let name = JobName::new(name)?;
        let duration = EstimatedDuration::from_minutes(estimated_minutes)?;
        let required_skills = required_skills
            .into_iter()
            .map(SkillTag::new)
            .collect::<Result<Vec<_>, _>>()?;

        let job = Job::schedule(
            NewJobData {
                name,
                description,
                customer_id,
                service_type,
                priority,
                scheduled_date,
                duration,
                required_skills,
            },
            &*self.clock,
        );

        self.jobs.store(&job).await?;
        tracing::info!(job = %job.id(), customer = %customer_id, "job scheduled");
        Ok(job)
    }

    /// Moves a job to a new lifecycle status.
    ///
    /// Dispatch roles may transition any job; technicians only jobs
    /// assigned to them.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PermissionDenied`] when the actor has
    /// neither job-management nor progress-recording rights,
    /// [`JobServiceError::NotAssignedToActor`] when a technician targets
    /// someone else's job, and [`JobServiceError::Domain`] for transitions
    /// the lifecycle forbids.
    pub async fn transition(
        &self,
        actor: &AuthenticatedPrincipal,
        job_id: JobId,
        target: JobStatus,
    ) -> JobServiceResult<Job> {
        let mut job = self.find_by_id_or_error(job_id).await?;

        if !actor.grants(Permission::ManageJobs) {
            require(actor, Permission::RecordJobProgress)?;
            if job.technician() != Some(actor.user_id()) {
                return Err(JobServiceError::NotAssignedToActor(job_id));
            }
        }

        job.transition_to(target, &*self.clock)?;
        self.jobs.update(&job).await?;
        tracing::info!(job = %job_id, status = %target, "job transitioned");
        Ok(job)
    }

    /// Assigns or reassigns a technician to a job.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::NotAnActiveTechnician`] when the target
    /// user is missing, inactive, or not a technician, and
    /// [`JobServiceError::PermissionDenied`] unless the actor may manage
    /// jobs.
    pub async fn assign_technician(
        &self,
        actor: &AuthenticatedPrincipal,
        job_id: JobId,
        technician: UserId,
    ) -> JobServiceResult<Job> {
        require(actor, Permission::ManageJobs)?;

        let account = self.users.find_by_id(technician).await?;
        let is_active_technician = account
            .as_ref()
            .is_some_and(|found| found.is_active() && found.role() == UserRole::Technician);
        if !is_active_technician {
            return Err(JobServiceError::NotAnActiveTechnician(technician));
        }

        let mut job = self.find_by_id_or_error(job_id).await?;
        job.assign_technician(technician, &*self.clock)?;
        self.jobs.update(&job).await?;
        tracing::info!(job = %job_id, technician = %technician, "job assigned");
        Ok(job)
    }

    /// Removes a job's technician assignment.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PermissionDenied`] unless the actor may
    /// manage jobs.
    pub async fn unassign_technician(
        &self,
        actor: &AuthenticatedPrincipal,
        job_id: JobId,
    ) -> JobServiceResult<Job> {
        require(actor, Permission::ManageJobs)?;

        let mut job = self.find_by_id_or_error(job_id).await?;
        job.unassign_technician(&*self.clock)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Moves a job to a different service date.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PermissionDenied`] unless the actor may
    /// manage jobs, or [`JobServiceError::Domain`] for terminal jobs.
    pub async fn reschedule(
        &self,
        actor: &AuthenticatedPrincipal,
        job_id: JobId,
        date: NaiveDate,
    ) -> JobServiceResult<Job> {
        require(actor, Permission::ManageJobs)?;

        let mut job = self.find_by_id_or_error(job_id).await?;
        job.reschedule(date, &*self.clock)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Updates a job's name, description, and priority.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PermissionDenied`] unless the actor may
    /// manage jobs, or [`JobServiceError::Domain`] when validation fails.
    pub async fn update_details(
        &self,
        actor: &AuthenticatedPrincipal,
        job_id: JobId,
        name: impl Into<String> + Send,
        description: Option<String>,
        priority: JobPriority,
    ) -> JobServiceResult<Job> {
        require(actor, Permission::ManageJobs)?;

        let name = JobName::new(name)?;
        let mut job = self.find_by_id_or_error(job_id).await?;
        job.update_details(name, description, priority, &*self.clock)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Finds a job by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn find(&self, job_id: JobId) -> JobServiceResult<Option<Job>> {
        Ok(self.jobs.find_by_id(job_id).await?)
    }

    /// Lists jobs with stable pagination.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list(&self, page: PageRequest) -> JobServiceResult<Page<Job>> {
        Ok(self.jobs.list(page).await?)
    }

    /// Lists jobs in a given status with stable pagination.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_by_status(
        &self,
        status: JobStatus,
        page: PageRequest,
    ) -> JobServiceResult<Page<Job>> {
        Ok(self.jobs.list_by_status(status, page).await?)
    }

    /// Returns a technician's jobs for a date, ordered by schedule.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn technician_day(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> JobServiceResult<Vec<Job>> {
        Ok(self.jobs.find_by_technician_on(technician, date).await?)
    }

    async fn find_by_id_or_error(&self, job_id: JobId) -> JobServiceResult<Job> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| JobRepositoryError::NotFound(job_id).into())
    }
}

const fn require(
    actor: &AuthenticatedPrincipal,
    permission: Permission,
) -> Result<(), JobServiceError> {
    if actor.grants(permission) {
        Ok(())
    } else {
        Err(JobServiceError::PermissionDenied {
            required: permission,
        })
    }
}
