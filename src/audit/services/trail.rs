//! Audit trail service: recording and admin-gated review.

use crate::audit::domain::{
    ActionLogEntry, ActionName, AuditDomainError, RequestOrigin, ResourceKind,
};
use crate::audit::ports::{ActionLogQuery, ActionLogRepository, ActionLogRepositoryError};
use crate::identity::domain::{AuthenticatedPrincipal, Permission, UserId};
use crate::page::{Page, PageRequest};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for audit trail operations.
#[derive(Debug, Error)]
pub enum AuditTrailError {
    /// The acting principal lacks the required permission.
    #[error("permission denied, requires {required}")]
    PermissionDenied {
        /// The permission the operation requires.
        required: Permission,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AuditDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ActionLogRepositoryError),
}

/// Result type for audit trail operations.
pub type AuditTrailResult<T> = Result<T, AuditTrailError>;

/// Records actions and serves the admin-only review listing.
#[derive(Clone)]
pub struct AuditTrailService<R, C>
where
    R: ActionLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    log: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AuditTrailService<R, C>
where
    R: ActionLogRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new audit trail service.
    #[must_use]
    pub const fn new(log: Arc<R>, clock: Arc<C>) -> Self {
        Self { log, clock }
    }

    /// Records one action. Callable from any service; recording is not a
    /// privileged operation.
    ///
    /// # Errors
    ///
    /// Returns [`AuditTrailError::Domain`] for invalid action names and
    /// [`AuditTrailError::Repository`] when the append fails.
    pub async fn record(
        &self,
        actor: UserId,
        action: &str,
        resource_kind: ResourceKind,
        resource_id: Option<String>,
        details: Value,
        origin: RequestOrigin,
    ) -> AuditTrailResult<ActionLogEntry> {
        let action = ActionName::new(action)?;
        let entry = ActionLogEntry::record(
            actor,
            action,
            resource_kind,
            resource_id,
            details,
            origin,
            &*self.clock,
        );
        self.log.append(&entry).await?;
        tracing::debug!(entry = %entry.id(), action = %entry.action(), "action recorded");
        Ok(entry)
    }

    /// Lists audit entries, newest first. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`AuditTrailError::PermissionDenied`] unless the actor may
    /// view action logs.
    pub async fn list(
        &self,
        actor: &AuthenticatedPrincipal,
        query: &ActionLogQuery,
        page: PageRequest,
    ) -> AuditTrailResult<Page<ActionLogEntry>> {
        if !actor.grants(Permission::ViewActionLogs) {
            return Err(AuditTrailError::PermissionDenied {
                required: Permission::ViewActionLogs,
            });
        }
        Ok(self.log.list(query, page).await?)
    }
}
