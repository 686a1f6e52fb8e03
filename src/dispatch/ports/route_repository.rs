//! Repository port for persisted route plans.

use crate::dispatch::domain::RoutePlan;
use crate::identity::domain::UserId;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for route plan repository operations.
pub type RoutePlanRepositoryResult<T> = Result<T, RoutePlanRepositoryError>;

/// Route plan persistence contract.
///
/// Plans are unique per `(technician, service date)`; saving a plan for an
/// occupied slot replaces the previous one.
#[async_trait]
pub trait RoutePlanRepository: Send + Sync {
    /// Saves a plan, replacing any existing plan for the same technician
    /// and date.
    async fn save(&self, plan: &RoutePlan) -> RoutePlanRepositoryResult<()>;

    /// Finds the plan for a technician on a date.
    ///
    /// Returns `None` when no plan exists.
    async fn find_by_technician_and_date(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> RoutePlanRepositoryResult<Option<RoutePlan>>;

    /// Returns every plan for a date, ordered by technician.
    async fn list_for_date(&self, date: NaiveDate) -> RoutePlanRepositoryResult<Vec<RoutePlan>>;
}

/// Errors returned by route plan repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RoutePlanRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RoutePlanRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
