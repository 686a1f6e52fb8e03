//! In-memory route plan repository for tests and headless composition.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dispatch::domain::RoutePlan;
use crate::dispatch::ports::{
    RoutePlanRepository, RoutePlanRepositoryError, RoutePlanRepositoryResult,
};
use crate::identity::domain::UserId;

/// Thread-safe in-memory route plan repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoutePlanRepository {
    state: Arc<RwLock<HashMap<(UserId, NaiveDate), RoutePlan>>>,
}

impl InMemoryRoutePlanRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> RoutePlanRepositoryError {
    RoutePlanRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RoutePlanRepository for InMemoryRoutePlanRepository {
    async fn save(&self, plan: &RoutePlan) -> RoutePlanRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert((plan.technician(), plan.service_date()), plan.clone());
        Ok(())
    }

    async fn find_by_technician_and_date(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> RoutePlanRepositoryResult<Option<RoutePlan>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&(technician, date)).cloned())
    }

    async fn list_for_date(&self, date: NaiveDate) -> RoutePlanRepositoryResult<Vec<RoutePlan>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut plans: Vec<RoutePlan> = state
            .values()
            .filter(|plan| plan.service_date() == date)
            .cloned()
            .collect();
        plans.sort_by_key(|plan| plan.technician().into_inner());
        Ok(plans)
    }
}
