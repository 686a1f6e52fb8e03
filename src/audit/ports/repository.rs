//! Repository port for the append-only action log.
//!
//! The contract is deliberately append-and-query only: audit immutability
//! is enforced by the absence of update and delete operations at the port
//! level, not by adapter discipline.

use crate::audit::domain::{ActionLogEntry, ActionLogId, ResourceKind};
use crate::identity::domain::UserId;
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for action log repository operations.
pub type ActionLogRepositoryResult<T> = Result<T, ActionLogRepositoryError>;

/// Filter for action log queries. All fields are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLogQuery {
    /// Restrict to entries by this actor.
    pub actor: Option<UserId>,
    /// Restrict to entries touching this resource kind.
    pub resource_kind: Option<ResourceKind>,
    /// Restrict to entries recorded at or after this instant.
    pub recorded_after: Option<DateTime<Utc>>,
    /// Restrict to entries recorded before this instant.
    pub recorded_before: Option<DateTime<Utc>>,
}

impl ActionLogQuery {
    /// Creates an unfiltered query.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            actor: None,
            resource_kind: None,
            recorded_after: None,
            recorded_before: None,
        }
    }

    /// Restricts the query to one actor.
    #[must_use]
    pub const fn by_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Restricts the query to one resource kind.
    #[must_use]
    pub const fn by_resource_kind(mut self, kind: ResourceKind) -> Self {
        self.resource_kind = Some(kind);
        self
    }

    /// Restricts the query to entries recorded at or after the instant.
    #[must_use]
    pub const fn recorded_after(mut self, instant: DateTime<Utc>) -> Self {
        self.recorded_after = Some(instant);
        self
    }

    /// Restricts the query to entries recorded before the instant.
    #[must_use]
    pub const fn recorded_before(mut self, instant: DateTime<Utc>) -> Self {
        self.recorded_before = Some(instant);
        self
    }

    /// Returns `true` when an entry matches every set filter.
    #[must_use]
    pub fn matches(&self, entry: &ActionLogEntry) -> bool {
        self.actor.is_none_or(|actor| entry.actor() == actor)
            && self
                .resource_kind
                .is_none_or(|kind| entry.resource_kind() == kind)
            && self
                .recorded_after
                .is_none_or(|after| entry.recorded_at() >= after)
            && self
                .recorded_before
                .is_none_or(|before| entry.recorded_at() < before)
    }
}

/// Action log persistence contract: append and query, nothing else.
#[async_trait]
pub trait ActionLogRepository: Send + Sync {
    /// Appends a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`ActionLogRepositoryError::DuplicateEntry`] when the entry
    /// ID already exists.
    async fn append(&self, entry: &ActionLogEntry) -> ActionLogRepositoryResult<()>;

    /// Lists matching entries, newest first, with stable pagination on
    /// `(recorded_at, id)`.
    async fn list(
        &self,
        query: &ActionLogQuery,
        page: PageRequest,
    ) -> ActionLogRepositoryResult<Page<ActionLogEntry>>;
}

/// Errors returned by action log repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ActionLogRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate action log entry: {0}")]
    DuplicateEntry(ActionLogId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActionLogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
