//! Shared wiring for the in-memory end-to-end suites.

use fieldline::audit::adapters::InMemoryActionLog;
use fieldline::audit::services::AuditTrailService;
use fieldline::config::{AuthTokenConfig, DispatchTuning};
use fieldline::customer::adapters::InMemoryCustomerRepository;
use fieldline::customer::services::CustomerDirectoryService;
use fieldline::dispatch::adapters::InMemoryRoutePlanRepository;
use fieldline::dispatch::estimator::HaversineEstimator;
use fieldline::dispatch::services::DispatchPlanningService;
use fieldline::identity::adapters::InMemoryUserRepository;
use fieldline::identity::domain::{AuthenticatedPrincipal, UserId, UserRole};
use fieldline::identity::services::{AuthService, TokenService, UserDirectoryService};
use fieldline::job::adapters::InMemoryJobRepository;
use fieldline::job::services::JobLifecycleService;
use fieldline::tracking::LocationRegistry;
use mockable::DefaultClock;
use std::sync::Arc;

/// Fully wired in-memory application stack.
pub struct App {
    pub users: UserDirectoryService<InMemoryUserRepository, DefaultClock>,
    pub auth: AuthService<InMemoryUserRepository, DefaultClock>,
    pub customers: CustomerDirectoryService<InMemoryCustomerRepository, DefaultClock>,
    pub jobs: JobLifecycleService<
        InMemoryJobRepository,
        InMemoryCustomerRepository,
        InMemoryUserRepository,
        DefaultClock,
    >,
    pub planning: DispatchPlanningService<
        InMemoryJobRepository,
        InMemoryUserRepository,
        InMemoryCustomerRepository,
        InMemoryRoutePlanRepository,
        DefaultClock,
    >,
    pub audit: AuditTrailService<InMemoryActionLog, DefaultClock>,
    pub tracking: Arc<LocationRegistry>,
}

/// Builds the full stack over fresh in-memory state.
pub fn app() -> App {
    let clock = Arc::new(DefaultClock);
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let customer_repo = Arc::new(InMemoryCustomerRepository::new());
    let job_repo = Arc::new(InMemoryJobRepository::new());
    let route_repo = Arc::new(InMemoryRoutePlanRepository::new());
    let action_log = Arc::new(InMemoryActionLog::new());
    let tracking = Arc::new(LocationRegistry::default());

    let tokens = Arc::new(TokenService::new(&AuthTokenConfig {
        access_secret: "integration-access-secret".to_owned(),
        refresh_secret: "integration-refresh-secret".to_owned(),
        access_ttl_minutes: 15,
        refresh_ttl_minutes: 60,
    }));

    let planning = DispatchPlanningService::new(
        Arc::clone(&job_repo),
        Arc::clone(&user_repo),
        Arc::clone(&customer_repo),
        Arc::clone(&route_repo),
        Arc::new(HaversineEstimator::default()),
        DispatchTuning::default(),
        Arc::clone(&clock),
    )
    .with_locator(tracking.clone())
    .with_audit(action_log.clone());

    App {
        users: UserDirectoryService::new(Arc::clone(&user_repo), Arc::clone(&clock)),
        auth: AuthService::new(Arc::clone(&user_repo), tokens, Arc::clone(&clock)),
        customers: CustomerDirectoryService::new(Arc::clone(&customer_repo), Arc::clone(&clock)),
        jobs: JobLifecycleService::new(
            job_repo,
            customer_repo,
            user_repo,
            Arc::clone(&clock),
        ),
        planning,
        audit: AuditTrailService::new(action_log, clock),
        tracking,
    }
}

/// A synthetic admin principal for seeding.
pub fn admin() -> AuthenticatedPrincipal {
    AuthenticatedPrincipal::new(UserId::new(), UserRole::Admin)
}
