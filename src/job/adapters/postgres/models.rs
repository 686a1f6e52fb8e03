//! Diesel row models for job persistence.

use super::schema::jobs;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for job records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    /// Internal job identifier.
    pub id: uuid::Uuid,
    /// Job name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Owning customer identifier.
    pub customer_id: uuid::Uuid,
    /// Kind of field work.
    pub service_type: String,
    /// Scheduling priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Assigned technician identifier.
    pub technician_id: Option<uuid::Uuid>,
    /// Target service date.
    pub scheduled_date: NaiveDate,
    /// Estimated on-site duration in minutes.
    pub estimated_minutes: i32,
    /// Required skill payload.
    pub required_skills: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for job records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jobs)]
pub struct NewJobRow {
    /// Internal job identifier.
    pub id: uuid::Uuid,
    /// Job name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Owning customer identifier.
    pub customer_id: uuid::Uuid,
    /// Kind of field work.
    pub service_type: String,
    /// Scheduling priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Assigned technician identifier.
    pub technician_id: Option<uuid::Uuid>,
    /// Target service date.
    pub scheduled_date: NaiveDate,
    /// Estimated on-site duration in minutes.
    pub estimated_minutes: i32,
    /// Required skill payload.
    pub required_skills: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
