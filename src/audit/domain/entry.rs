//! Append-only action log entry and its value objects.

use super::{AuditDomainError, ParseResourceKindError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Maximum length for an action name, matching the `VARCHAR(100)` column.
const MAX_ACTION_NAME_LENGTH: usize = 100;

/// Unique identifier for an action log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLogId(Uuid);

impl ActionLogId {
    /// Creates a new random entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entry identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ActionLogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated dotted action verb, e.g. `job.create` or `route.plan`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(String);

impl ActionName {
    /// Creates a validated action name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_.]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AuditDomainError::EmptyActionName`],
    /// [`AuditDomainError::ActionNameTooLong`], or
    /// [`AuditDomainError::InvalidActionName`] accordingly.
    pub fn new(value: impl Into<String>) -> Result<Self, AuditDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(AuditDomainError::EmptyActionName);
        }
        if normalized.len() > MAX_ACTION_NAME_LENGTH {
            return Err(AuditDomainError::ActionNameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
        if !is_valid {
            return Err(AuditDomainError::InvalidActionName(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the action name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of resource an audited action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A user account.
    User,
    /// A customer record.
    Customer,
    /// A job record.
    Job,
    /// A persisted route plan.
    RoutePlan,
    /// A job attachment.
    Attachment,
}

impl ResourceKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Customer => "customer",
            Self::Job => "job",
            Self::RoutePlan => "route_plan",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResourceKind {
    type Error = ParseResourceKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "user" => Ok(Self::User),
            "customer" => Ok(Self::Customer),
            "job" => Ok(Self::Job),
            "route_plan" => Ok(Self::RoutePlan),
            "attachment" => Ok(Self::Attachment),
            _ => Err(ParseResourceKindError(value.to_owned())),
        }
    }
}

/// Network origin captured from the request that triggered an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    /// Remote address, if known.
    pub ip: Option<String>,
    /// User-agent header, if present.
    pub user_agent: Option<String>,
}

impl RequestOrigin {
    /// Creates an origin with no identifying data.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ip: None,
            user_agent: None,
        }
    }

    /// Sets the remote address.
    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Sets the user-agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// One append-only audit record: who did what to which resource, when,
/// and from where.
///
/// Entries are write-once read-many; no update or delete path exists at
/// any layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogEntry {
    id: ActionLogId,
    actor: UserId,
    action: ActionName,
    resource_kind: ResourceKind,
    resource_id: Option<String>,
    details: Value,
    origin: RequestOrigin,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted entry.
#[derive(Debug, Clone)]
pub struct PersistedActionLogData {
    /// Persisted entry identifier.
    pub id: ActionLogId,
    /// Persisted acting user.
    pub actor: UserId,
    /// Persisted action name.
    pub action: ActionName,
    /// Persisted resource kind.
    pub resource_kind: ResourceKind,
    /// Persisted resource identifier, if any.
    pub resource_id: Option<String>,
    /// Persisted details payload.
    pub details: Value,
    /// Persisted request origin.
    pub origin: RequestOrigin,
    /// Persisted record timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl ActionLogEntry {
    /// Records a new audit entry at the current clock time.
    #[must_use]
    pub fn record(
        actor: UserId,
        action: ActionName,
        resource_kind: ResourceKind,
        resource_id: Option<String>,
        details: Value,
        origin: RequestOrigin,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ActionLogId::new(),
            actor,
            action,
            resource_kind,
            resource_id,
            details,
            origin,
            recorded_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedActionLogData) -> Self {
        Self {
            id: data.id,
            actor: data.actor,
            action: data.action,
            resource_kind: data.resource_kind,
            resource_id: data.resource_id,
            details: data.details,
            origin: data.origin,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> ActionLogId {
        self.id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns the action name.
    #[must_use]
    pub const fn action(&self) -> &ActionName {
        &self.action
    }

    /// Returns the resource kind.
    #[must_use]
    pub const fn resource_kind(&self) -> ResourceKind {
        self.resource_kind
    }

    /// Returns the resource identifier, if any.
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Returns the details payload.
    #[must_use]
    pub const fn details(&self) -> &Value {
        &self.details
    }

    /// Returns the request origin.
    #[must_use]
    pub const fn origin(&self) -> &RequestOrigin {
        &self.origin
    }

    /// Returns the record timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
