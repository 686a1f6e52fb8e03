//! User roles and the capability checks derived from them.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full administrative access, including user management and audit logs.
    Admin,
    /// Operational oversight of customers, jobs, and routes.
    Manager,
    /// Day-to-day job intake and route planning.
    Dispatcher,
    /// Field worker performing jobs.
    Technician,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Dispatcher => "dispatcher",
            Self::Technician => "technician",
        }
    }

    /// Returns `true` when the role carries the given permission.
    #[must_use]
    pub const fn grants(self, permission: Permission) -> bool {
        match self {
            Self::Admin => true,
            Self::Manager | Self::Dispatcher => matches!(
                permission,
                Permission::ManageCustomers | Permission::ManageJobs | Permission::PlanRoutes
            ),
            Self::Technician => matches!(permission, Permission::RecordJobProgress),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserRole {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "dispatcher" => Ok(Self::Dispatcher),
            "technician" => Ok(Self::Technician),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Capabilities checked by the service layer before acting on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Create, list, and modify user accounts.
    ManageUsers,
    /// Read the append-only action log.
    ViewActionLogs,
    /// Create and modify customer records.
    ManageCustomers,
    /// Create, modify, assign, and transition jobs.
    ManageJobs,
    /// Run route planning and persist route plans.
    PlanRoutes,
    /// Update progress on one's own assigned jobs.
    RecordJobProgress,
}

impl Permission {
    /// Returns a short human-readable name for error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageUsers => "manage_users",
            Self::ViewActionLogs => "view_action_logs",
            Self::ManageCustomers => "manage_customers",
            Self::ManageJobs => "manage_jobs",
            Self::PlanRoutes => "plan_routes",
            Self::RecordJobProgress => "record_job_progress",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
