//! Diesel row models for user account persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Internal account identifier.
    pub id: uuid::Uuid,
    /// Human-readable display name.
    pub display_name: String,
    /// Normalized email address.
    pub email: String,
    /// Assigned role.
    pub role: String,
    /// Lifecycle status.
    pub status: String,
    /// Skill tag payload.
    pub skills: Value,
    /// Bcrypt password digest.
    pub password_hash: String,
    /// Most recent login timestamp.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Internal account identifier.
    pub id: uuid::Uuid,
    /// Human-readable display name.
    pub display_name: String,
    /// Normalized email address.
    pub email: String,
    /// Assigned role.
    pub role: String,
    /// Lifecycle status.
    pub status: String,
    /// Skill tag payload.
    pub skills: Value,
    /// Bcrypt password digest.
    pub password_hash: String,
    /// Most recent login timestamp.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
