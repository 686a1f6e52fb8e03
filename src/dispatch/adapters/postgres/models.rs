//! Diesel row models for route plan persistence.

use super::schema::route_plans;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for route plan records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = route_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoutePlanRow {
    /// Internal plan identifier.
    pub id: uuid::Uuid,
    /// Technician the plan belongs to.
    pub technician_id: uuid::Uuid,
    /// Planned service date.
    pub service_date: NaiveDate,
    /// Ordered stop payload.
    pub stops: Value,
    /// How the ordering was produced.
    pub ordering: String,
    /// Total driving distance in metres.
    pub distance_meters: i64,
    /// Total driving time in seconds.
    pub travel_seconds: i64,
    /// Total on-site service time in minutes.
    pub service_minutes: i32,
    /// Estimated fuel cost in cents.
    pub fuel_cost_cents: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for route plan records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = route_plans)]
pub struct NewRoutePlanRow {
    /// Internal plan identifier.
    pub id: uuid::Uuid,
    /// Technician the plan belongs to.
    pub technician_id: uuid::Uuid,
    /// Planned service date.
    pub service_date: NaiveDate,
    /// Ordered stop payload.
    pub stops: Value,
    /// How the ordering was produced.
    pub ordering: String,
    /// Total driving distance in metres.
    pub distance_meters: i64,
    /// Total driving time in seconds.
    pub travel_seconds: i64,
    /// Total on-site service time in minutes.
    pub service_minutes: i32,
    /// Estimated fuel cost in cents.
    pub fuel_cost_cents: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
