//! Unit tests for the job context.


use crate::customer::domain::CustomerId;
use crate::job::domain::{
    EstimatedDuration, Job, JobDomainError, JobName, JobPriority, NewJobData, ServiceType,
};
use chrono::NaiveDate;
use mockable::DefaultClock;

/// The service date used throughout the suite.
pub fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

/// Builds a pending maintenance job for an arbitrary customer.
pub fn pending_job() -> Result<Job, JobDomainError> {
    let data = NewJobData {
        name: JobName::new("Meter swap")?,
        description: Some("Replace failing meter".to_owned()),
        customer_id: CustomerId::new(),
        service_type: ServiceType::Maintenance,
        priority: JobPriority::Medium,
        scheduled_date: service_date(),
        duration: EstimatedDuration::from_minutes(45)?,
        required_skills: Vec::new(),
    };
    Ok(Job::schedule(data, &DefaultClock))
}
