//! Diesel row models for customer persistence.

use super::schema::customers;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for customer records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    /// Internal customer identifier.
    pub id: uuid::Uuid,
    /// Customer name.
    pub name: String,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Geocoded latitude.
    pub latitude: Option<f64>,
    /// Geocoded longitude.
    pub longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for customer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    /// Internal customer identifier.
    pub id: uuid::Uuid,
    /// Customer name.
    pub name: String,
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Geocoded latitude.
    pub latitude: Option<f64>,
    /// Geocoded longitude.
    pub longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
