//! Dispatch planning orchestration: collect, partition, optimize, persist.

use crate::audit::domain::{ActionLogEntry, ActionName, RequestOrigin, ResourceKind};
use crate::audit::ports::{ActionLogRepository, ActionLogRepositoryError};
use crate::config::DispatchTuning;
use crate::customer::ports::{CustomerRepository, CustomerRepositoryError};
use crate::dispatch::assignment::{Assignment, AssignmentEngine};
use crate::dispatch::domain::{
    DispatchPlan, FuelModel, OptimizeMode, OptimizeOptions, OptimizedRoute, RoutePlan, Stop,
    TechnicianProfile, UnassignedJob, UnassignedReason,
};
use crate::dispatch::estimator::HaversineEstimator;
use crate::dispatch::ports::{
    RoutePlanRepository, RoutePlanRepositoryError, TechnicianLocator, TravelEstimator,
};
use crate::dispatch::solver::{SolveError, solve_route};
use crate::geo::GeoPoint;
use crate::identity::domain::{AuthenticatedPrincipal, Permission, UserId};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::job::domain::Job;
use crate::job::ports::{JobRepository, JobRepositoryError};
use chrono::NaiveDate;
use mockable::Clock;
use rayon::prelude::*;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for planning one service date.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Cost dimension to minimize.
    pub mode: OptimizeMode,
    /// Inflate time costs by the configured peak factor.
    pub traffic_aware: bool,
    /// Route start for technicians with no tracked position.
    pub depot: GeoPoint,
    /// Shift capacity ceiling in on-site minutes.
    pub shift_minutes: u32,
}

impl PlanRequest {
    /// Default single-shift capacity.
    const DEFAULT_SHIFT_MINUTES: u32 = 480;

    /// Creates a distance-minimizing request with an eight-hour shift.
    #[must_use]
    pub const fn new(depot: GeoPoint) -> Self {
        Self {
            mode: OptimizeMode::Distance,
            traffic_aware: false,
            depot,
            shift_minutes: Self::DEFAULT_SHIFT_MINUTES,
        }
    }

    /// Sets the cost dimension.
    #[must_use]
    pub const fn with_mode(mut self, mode: OptimizeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables traffic awareness.
    #[must_use]
    pub const fn traffic_aware(mut self) -> Self {
        self.traffic_aware = true;
        self
    }

    /// Sets the shift capacity ceiling.
    #[must_use]
    pub const fn with_shift_minutes(mut self, minutes: u32) -> Self {
        self.shift_minutes = minutes;
        self
    }
}

/// Service-level errors for dispatch planning.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The acting principal lacks the required permission.
    #[error("permission denied, requires {required}")]
    PermissionDenied {
        /// The permission the operation requires.
        required: Permission,
    },

    /// Route optimization failed.
    #[error(transparent)]
    Solve(#[from] SolveError),

    /// The optimization task was aborted.
    #[error("optimization task failed: {0}")]
    Background(String),

    /// Job repository operation failed.
    #[error(transparent)]
    Jobs(#[from] JobRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// Customer repository operation failed.
    #[error(transparent)]
    Customers(#[from] CustomerRepositoryError),

    /// Route plan repository operation failed.
    #[error(transparent)]
    Routes(#[from] RoutePlanRepositoryError),

    /// Audit append failed.
    #[error(transparent)]
    Audit(#[from] ActionLogRepositoryError),
}

/// Result type for dispatch planning operations.
pub type PlanningResult<T> = Result<T, PlanningError>;

/// Plans technician routes for a service date.
///
/// The collector half gathers pending jobs and active technicians through
/// the job, identity, and customer ports; the optimization half partitions
/// the stops, solves each technician's route on the rayon pool, persists
/// the resulting plans, and leaves an audit record.
#[derive(Clone)]
pub struct DispatchPlanningService<J, U, CU, R, C>
where
    J: JobRepository,
    U: UserRepository,
    CU: CustomerRepository,
    R: RoutePlanRepository,
    C: Clock + Send + Sync,
{
    jobs: Arc<J>,
    users: Arc<U>,
    customers: Arc<CU>,
    routes: Arc<R>,
    estimator: Arc<dyn TravelEstimator>,
    locator: Option<Arc<dyn TechnicianLocator>>,
    audit: Option<Arc<dyn ActionLogRepository>>,
    tuning: DispatchTuning,
    clock: Arc<C>,
}

impl<J, U, CU, R, C> DispatchPlanningService<J, U, CU, R, C>
where
    J: JobRepository,
    U: UserRepository,
    CU: CustomerRepository,
    R: RoutePlanRepository,
    C: Clock + Send + Sync,
{
    /// Creates a planning service.
    #[must_use]
    pub fn new(
        jobs: Arc<J>,
        users: Arc<U>,
        customers: Arc<CU>,
        routes: Arc<R>,
        estimator: Arc<dyn TravelEstimator>,
        tuning: DispatchTuning,
        clock: Arc<C>,
    ) -> Self {
        Self {
            jobs,
            users,
            customers,
            routes,
            estimator,
            locator: None,
            audit: None,
            tuning,
            clock,
        }
    }

    /// Uses live technician positions as route starts where available.
    #[must_use]
    pub fn with_locator(mut self, locator: Arc<dyn TechnicianLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Records an audit entry for every planning run.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ActionLogRepository>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Plans routes for every pending job on the given date.
    ///
    /// Persists one [`RoutePlan`] per routed technician, replacing any
    /// previous plan for the same `(technician, date)` slot.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::PermissionDenied`] unless the actor may
    /// plan routes, and propagates repository and solver failures. An
    /// unreachable external travel estimator is not an error; planning
    /// falls back to great-circle estimates.
    pub async fn plan_for_date(
        &self,
        actor: &AuthenticatedPrincipal,
        date: NaiveDate,
        request: PlanRequest,
    ) -> PlanningResult<DispatchPlan> {
        if !actor.grants(Permission::PlanRoutes) {
            return Err(PlanningError::PermissionDenied {
                required: Permission::PlanRoutes,
            });
        }

        let jobs = self.jobs.find_schedulable_for(date).await?;
        let technicians = self.technician_profiles(&request).await?;
        let (stops, mut unassigned) = self.collect_stops(jobs).await?;

        tracing::info!(
            date = %date,
            jobs = stops.len() + unassigned.len(),
            technicians = technicians.len(),
            "planning dispatch"
        );

        let partition = AssignmentEngine::partition(stops, technicians);
        unassigned.extend(partition.unassigned);

        let routes = self
            .optimize_assignments(partition.assignments, &request)
            .await?;

        for route in &routes {
            let plan = RoutePlan::from_route(route, date, &*self.clock);
            self.routes.save(&plan).await?;
        }

        self.record_audit(actor, date, &routes, &unassigned).await?;

        Ok(DispatchPlan::new(
            date,
            routes,
            unassigned,
            self.clock.utc(),
        ))
    }

    /// Returns every persisted plan for a date.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Routes`] when persistence lookup fails.
    pub async fn plans_for_date(&self, date: NaiveDate) -> PlanningResult<Vec<RoutePlan>> {
        Ok(self.routes.list_for_date(date).await?)
    }

    /// Returns the persisted plan for a technician on a date, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Routes`] when persistence lookup fails.
    pub async fn plan_for_technician(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> PlanningResult<Option<RoutePlan>> {
        Ok(self
            .routes
            .find_by_technician_and_date(technician, date)
            .await?)
    }

    async fn technician_profiles(
        &self,
        request: &PlanRequest,
    ) -> PlanningResult<Vec<TechnicianProfile>> {
        let accounts = self.users.list_active_technicians().await?;

        let profiles = accounts
            .into_iter()
            .map(|account| {
                let start = self
                    .locator
                    .as_ref()
                    .and_then(|locator| locator.locate(account.id()))
                    .unwrap_or(request.depot);
                TechnicianProfile::new(
                    account.id(),
                    account.name().as_str().to_owned(),
                    start,
                    account.skills().to_vec(),
                    request.shift_minutes,
                )
            })
            .collect();
        Ok(profiles)
    }

    async fn collect_stops(
        &self,
        jobs: Vec<Job>,
    ) -> PlanningResult<(Vec<Stop>, Vec<UnassignedJob>)> {
        let mut stops = Vec::with_capacity(jobs.len());
        let mut unassigned = Vec::new();

        for job in jobs {
            let customer = self.customers.find_by_id(job.customer_id()).await?;
            let coordinates = customer.as_ref().and_then(|found| found.coordinates());

            match coordinates {
                Some(location) => stops.push(Stop::new(
                    job.id(),
                    location,
                    job.duration().minutes(),
                    job.priority(),
                    job.required_skills().to_vec(),
                )),
                None => {
                    tracing::warn!(job = %job.id(), customer = %job.customer_id(), "job site not geocoded");
                    unassigned.push(UnassignedJob {
                        job_id: job.id(),
                        reason: UnassignedReason::MissingCoordinates,
                    });
                }
            }
        }

        Ok((stops, unassigned))
    }

    async fn optimize_assignments(
        &self,
        assignments: Vec<Assignment>,
        request: &PlanRequest,
    ) -> PlanningResult<Vec<OptimizedRoute>> {
        let options = OptimizeOptions {
            mode: request.mode,
            traffic_aware: request.traffic_aware,
            traffic_peak_factor: self.tuning.traffic_peak_factor,
            fallback_speed_kmh: self.tuning.average_speed_kmh,
            ..OptimizeOptions::default()
        };
        let fuel = FuelModel {
            price_cents_per_litre: self.tuning.fuel_price_cents_per_litre,
            litres_per_100_km: self.tuning.litres_per_100_km,
        };
        let fallback = HaversineEstimator::new(self.tuning.average_speed_kmh);
        let estimator = Arc::clone(&self.estimator);

        let occupied: Vec<Assignment> = assignments
            .into_iter()
            .filter(|assignment| !assignment.stops.is_empty())
            .collect();

        // Per-technician solves are independent and CPU-bound; fan out on
        // the rayon pool from a blocking task.
        tokio::task::spawn_blocking(move || {
            occupied
                .into_par_iter()
                .map(|assignment| {
                    let Assignment { technician, stops } = assignment;
                    match solve_route(&technician, stops.clone(), estimator.as_ref(), &options, fuel)
                    {
                        Err(SolveError::Estimator(err)) => {
                            tracing::warn!(
                                technician = %technician.user_id(),
                                error = %err,
                                "travel estimator failed, using great-circle fallback"
                            );
                            solve_route(&technician, stops, &fallback, &options, fuel)
                        }
                        other => other,
                    }
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|err| PlanningError::Background(err.to_string()))?
        .map_err(PlanningError::from)
    }

    async fn record_audit(
        &self,
        actor: &AuthenticatedPrincipal,
        date: NaiveDate,
        routes: &[OptimizedRoute],
        unassigned: &[UnassignedJob],
    ) -> PlanningResult<()> {
        let Some(audit) = self.audit.as_ref() else {
            return Ok(());
        };
        // The literal is known-valid; an error here would be a programming
        // mistake, not input.
        let Ok(action) = ActionName::new("route.plan") else {
            return Ok(());
        };

        let details = serde_json::json!({
            "date": date.to_string(),
            "routes": routes.len(),
            "stops": routes.iter().map(|route| route.stops().len()).sum::<usize>(),
            "unassigned": unassigned.len(),
        });
        let entry = ActionLogEntry::record(
            actor.user_id(),
            action,
            ResourceKind::RoutePlan,
            Some(date.to_string()),
            details,
            RequestOrigin::empty(),
            &*self.clock,
        );
        audit.append(&entry).await?;
        Ok(())
    }
}
