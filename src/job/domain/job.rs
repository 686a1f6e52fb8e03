//! Job aggregate root.

use super::{
    EstimatedDuration, JobDomainError, JobId, JobPriority, JobStatus, ServiceType,
};
use crate::customer::domain::CustomerId;
use crate::identity::domain::{SkillTag, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a job name, matching the `VARCHAR(200)` column.
const MAX_JOB_NAME_LENGTH: usize = 200;

/// Validated job name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Creates a validated job name.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyJobName`] when the value is empty
    /// after trimming or [`JobDomainError::JobNameTooLong`] when it exceeds
    /// 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(JobDomainError::EmptyJobName);
        }
        if trimmed.chars().count() > MAX_JOB_NAME_LENGTH {
            return Err(JobDomainError::JobNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the job name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JobName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameter object for scheduling a new job.
#[derive(Debug, Clone)]
pub struct NewJobData {
    /// Job name.
    pub name: JobName,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Kind of field work.
    pub service_type: ServiceType,
    /// Scheduling priority.
    pub priority: JobPriority,
    /// Target service date.
    pub scheduled_date: NaiveDate,
    /// Estimated on-site duration.
    pub duration: EstimatedDuration,
    /// Skills a technician needs to work this job.
    pub required_skills: Vec<SkillTag>,
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted job name.
    pub name: JobName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted owning customer.
    pub customer_id: CustomerId,
    /// Persisted service type.
    pub service_type: ServiceType,
    /// Persisted priority.
    pub priority: JobPriority,
    /// Persisted lifecycle status.
    pub status: JobStatus,
    /// Persisted assigned technician, if any.
    pub technician: Option<UserId>,
    /// Persisted service date.
    pub scheduled_date: NaiveDate,
    /// Persisted estimated duration.
    pub duration: EstimatedDuration,
    /// Persisted required skills.
    pub required_skills: Vec<SkillTag>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Job aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobId,
    name: JobName,
    description: Option<String>,
    customer_id: CustomerId,
    service_type: ServiceType,
    priority: JobPriority,
    status: JobStatus,
    technician: Option<UserId>,
    scheduled_date: NaiveDate,
    duration: EstimatedDuration,
    required_skills: Vec<SkillTag>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    /// Schedules a new pending job.
    #[must_use]
    pub fn schedule(data: NewJobData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: JobId::new(),
            name: data.name,
            description: data.description,
            customer_id: data.customer_id,
            service_type: data.service_type,
            priority: data.priority,
            status: JobStatus::Pending,
            technician: None,
            scheduled_date: data.scheduled_date,
            duration: data.duration,
            required_skills: data.required_skills,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            customer_id: data.customer_id,
            service_type: data.service_type,
            priority: data.priority,
            status: data.status,
            technician: data.technician,
            scheduled_date: data.scheduled_date,
            duration: data.duration,
            required_skills: data.required_skills,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the job name.
    #[must_use]
    pub const fn name(&self) -> &JobName {
        &self.name
    }

    /// Returns the free-form description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the kind of field work.
    #[must_use]
    pub const fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Returns the scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> JobPriority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the assigned technician, if any.
    #[must_use]
    pub const fn technician(&self) -> Option<UserId> {
        self.technician
    }

    /// Returns the target service date.
    #[must_use]
    pub const fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }

    /// Returns the estimated on-site duration.
    #[must_use]
    pub const fn duration(&self) -> EstimatedDuration {
        self.duration
    }

    /// Returns the skills a technician needs to work this job.
    #[must_use]
    pub fn required_skills(&self) -> &[SkillTag] {
        &self.required_skills
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the job to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidStateTransition`] when the
    /// transition table forbids the move; the job is left untouched.
    pub fn transition_to(
        &mut self,
        target: JobStatus,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(JobDomainError::InvalidStateTransition {
                job_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Assigns or reassigns a technician.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::ModifyTerminalJob`] when the job is
    /// completed or cancelled.
    pub fn assign_technician(
        &mut self,
        technician: UserId,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_open()?;
        self.technician = Some(technician);
        self.touch(clock);
        Ok(())
    }

    /// Removes the technician assignment.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::ModifyTerminalJob`] when the job is
    /// completed or cancelled.
    pub fn unassign_technician(&mut self, clock: &impl Clock) -> Result<(), JobDomainError> {
        self.ensure_open()?;
        self.technician = None;
        self.touch(clock);
        Ok(())
    }

    /// Moves the job to a different service date.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::ModifyTerminalJob`] when the job is
    /// completed or cancelled.
    pub fn reschedule(
        &mut self,
        date: NaiveDate,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_open()?;
        self.scheduled_date = date;
        self.touch(clock);
        Ok(())
    }

    /// Updates name, description, and priority in one edit.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::ModifyTerminalJob`] when the job is
    /// completed or cancelled.
    pub fn update_details(
        &mut self,
        name: JobName,
        description: Option<String>,
        priority: JobPriority,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_open()?;
        self.name = name;
        self.description = description;
        self.priority = priority;
        self.touch(clock);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), JobDomainError> {
        if self.status.is_terminal() {
            return Err(JobDomainError::ModifyTerminalJob {
                job_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
