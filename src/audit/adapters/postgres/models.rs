//! Diesel row models for action log persistence.

use super::schema::action_logs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for action log records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = action_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActionLogRow {
    /// Internal entry identifier.
    pub id: uuid::Uuid,
    /// Acting user identifier.
    pub actor_id: uuid::Uuid,
    /// Dotted action verb.
    pub action: String,
    /// Resource kind the action touched.
    pub resource_kind: String,
    /// Resource identifier, if any.
    pub resource_id: Option<String>,
    /// Free-form details payload.
    pub details: Value,
    /// Remote address, if known.
    pub origin_ip: Option<String>,
    /// User-agent header, if present.
    pub user_agent: Option<String>,
    /// Record timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for action log records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = action_logs)]
pub struct NewActionLogRow {
    /// Internal entry identifier.
    pub id: uuid::Uuid,
    /// Acting user identifier.
    pub actor_id: uuid::Uuid,
    /// Dotted action verb.
    pub action: String,
    /// Resource kind the action touched.
    pub resource_kind: String,
    /// Resource identifier, if any.
    pub resource_id: Option<String>,
    /// Free-form details payload.
    pub details: Value,
    /// Remote address, if known.
    pub origin_ip: Option<String>,
    /// User-agent header, if present.
    pub user_agent: Option<String>,
    /// Record timestamp.
    pub recorded_at: DateTime<Utc>,
}
