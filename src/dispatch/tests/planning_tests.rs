//! Unit tests for the dispatch planning service.

use crate::audit::adapters::InMemoryActionLog;
use crate::audit::ports::{ActionLogQuery, ActionLogRepository};
use crate::config::DispatchTuning;
use crate::customer::adapters::InMemoryCustomerRepository;
use crate::customer::domain::{Customer, CustomerName, PostalAddress};
use crate::customer::ports::CustomerRepository;
use crate::dispatch::adapters::InMemoryRoutePlanRepository;
use crate::dispatch::domain::{OptimizeMode, TravelMatrix, UnassignedReason};
use crate::dispatch::estimator::HaversineEstimator;
use crate::dispatch::ports::{EstimatorError, TravelEstimator};
use crate::dispatch::services::{DispatchPlanningService, PlanRequest, PlanningError};
use crate::geo::GeoPoint;
use crate::identity::adapters::InMemoryUserRepository;
use crate::identity::domain::{AuthenticatedPrincipal, SkillTag, UserId, UserRole};
use crate::identity::ports::UserRepository;
use crate::job::adapters::InMemoryJobRepository;
use crate::job::domain::{
    EstimatedDuration, Job, JobName, JobPriority, NewJobData, ServiceType,
};
use crate::job::ports::JobRepository;
use crate::page::PageRequest;
use chrono::NaiveDate;
use eyre::{bail, ensure};
use mockable::DefaultClock;
use std::sync::Arc;

use super::point;

/// Estimator that always fails at transport level, forcing the fallback.
struct DownEstimator;

impl TravelEstimator for DownEstimator {
    fn travel_matrix(&self, _points: &[GeoPoint]) -> Result<TravelMatrix, EstimatorError> {
        Err(EstimatorError::Transport("connection refused".to_owned()))
    }
}

type Service = DispatchPlanningService<
    InMemoryJobRepository,
    InMemoryUserRepository,
    InMemoryCustomerRepository,
    InMemoryRoutePlanRepository,
    DefaultClock,
>;

struct Harness {
    service: Service,
    users: Arc<InMemoryUserRepository>,
    customers: Arc<InMemoryCustomerRepository>,
    jobs: Arc<InMemoryJobRepository>,
    audit: Arc<InMemoryActionLog>,
}

fn harness_with_estimator(estimator: Arc<dyn TravelEstimator>) -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let customers = Arc::new(InMemoryCustomerRepository::new());
    let jobs = Arc::new(InMemoryJobRepository::new());
    let routes = Arc::new(InMemoryRoutePlanRepository::new());
    let audit = Arc::new(InMemoryActionLog::new());

    let service = DispatchPlanningService::new(
        Arc::clone(&jobs),
        Arc::clone(&users),
        Arc::clone(&customers),
        routes,
        estimator,
        DispatchTuning::default(),
        Arc::new(DefaultClock),
    )
    .with_audit(audit.clone());

    Harness {
        service,
        users,
        customers,
        jobs,
        audit,
    }
}

fn harness() -> Harness {
    harness_with_estimator(Arc::new(HaversineEstimator::default()))
}

fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

fn dispatcher() -> AuthenticatedPrincipal {
    AuthenticatedPrincipal::new(UserId::new(), UserRole::Dispatcher)
}

async fn seed_technician(harness: &Harness, skills: &[&str]) -> eyre::Result<UserId> {
    let mut account = crate::identity::tests::account_with_role(
        &format!("tech-{}@example.com", UserId::new()),
        UserRole::Technician,
    )?;
    let skills = skills
        .iter()
        .map(|tag| SkillTag::new(*tag).map_err(|err| eyre::eyre!(err)))
        .collect::<eyre::Result<Vec<_>>>()?;
    account.set_skills(skills, &DefaultClock);
    harness.users.store(&account).await?;
    Ok(account.id())
}

async fn seed_customer(
    harness: &Harness,
    coordinates: Option<GeoPoint>,
) -> eyre::Result<Customer> {
    let mut customer = Customer::register(
        CustomerName::new("Acme Utilities").map_err(|err| eyre::eyre!(err))?,
        PostalAddress::new("1 Main St", "Springfield", "IL", "62701")
            .map_err(|err| eyre::eyre!(err))?,
        &DefaultClock,
    );
    if let Some(position) = coordinates {
        customer.set_coordinates(position, &DefaultClock);
    }
    harness.customers.store(&customer).await?;
    Ok(customer)
}

async fn seed_job(
    harness: &Harness,
    customer: &Customer,
    skills: &[&str],
    minutes: u32,
) -> eyre::Result<Job> {
    let required_skills = skills
        .iter()
        .map(|tag| SkillTag::new(*tag).map_err(|err| eyre::eyre!(err)))
        .collect::<eyre::Result<Vec<_>>>()?;
    let job = Job::schedule(
        NewJobData {
            name: JobName::new("Planned work").map_err(|err| eyre::eyre!(err))?,
            description: None,
            customer_id: customer.id(),
            service_type: ServiceType::Maintenance,
            priority: JobPriority::Medium,
            scheduled_date: service_date(),
            duration: EstimatedDuration::from_minutes(minutes).map_err(|err| eyre::eyre!(err))?,
            required_skills,
        },
        &DefaultClock,
    );
    harness.jobs.store(&job).await?;
    Ok(job)
}

fn request() -> eyre::Result<PlanRequest> {
    Ok(PlanRequest::new(point(47.0, 8.0)?))
}

#[tokio::test]
async fn planning_routes_jobs_and_persists_plans() -> eyre::Result<()> {
    let harness = harness();
    let technician = seed_technician(&harness, &[]).await?;

    let geocoded = seed_customer(&harness, Some(point(47.02, 8.02)?)).await?;
    let blind = seed_customer(&harness, None).await?;

    let routed = seed_job(&harness, &geocoded, &[], 60).await?;
    let unroutable = seed_job(&harness, &blind, &[], 30).await?;

    let plan = harness
        .service
        .plan_for_date(&dispatcher(), service_date(), request()?)
        .await?;

    ensure!(plan.routes().len() == 1);
    let route = plan
        .routes()
        .first()
        .ok_or_else(|| eyre::eyre!("expected one route"))?;
    ensure!(route.technician() == technician);
    ensure!(route.stops().iter().all(|s| s.stop.job_id() == routed.id()));

    ensure!(plan.unassigned().len() == 1);
    ensure!(plan.unassigned().iter().all(|item| {
        item.job_id == unroutable.id() && item.reason == UnassignedReason::MissingCoordinates
    }));

    // The plan is persisted and queryable.
    let persisted = harness.service.plans_for_date(service_date()).await?;
    ensure!(persisted.len() == 1);
    let by_technician = harness
        .service
        .plan_for_technician(technician, service_date())
        .await?;
    ensure!(by_technician.as_ref().is_some_and(|p| p.stops().len() == 1));
    Ok(())
}

#[tokio::test]
async fn replanning_replaces_the_previous_plan() -> eyre::Result<()> {
    let harness = harness();
    seed_technician(&harness, &[]).await?;
    let customer = seed_customer(&harness, Some(point(47.02, 8.02)?)).await?;
    seed_job(&harness, &customer, &[], 60).await?;

    harness
        .service
        .plan_for_date(&dispatcher(), service_date(), request()?)
        .await?;
    seed_job(&harness, &customer, &[], 30).await?;
    harness
        .service
        .plan_for_date(&dispatcher(), service_date(), request()?)
        .await?;

    let persisted = harness.service.plans_for_date(service_date()).await?;
    ensure!(persisted.len() == 1, "one slot per technician and date");
    ensure!(persisted.iter().all(|plan| plan.stops().len() == 2));
    Ok(())
}

#[tokio::test]
async fn technicians_cannot_plan_routes() -> eyre::Result<()> {
    let harness = harness();
    let actor = AuthenticatedPrincipal::new(UserId::new(), UserRole::Technician);

    match harness
        .service
        .plan_for_date(&actor, service_date(), request()?)
        .await
    {
        Err(PlanningError::PermissionDenied { .. }) => Ok(()),
        other => bail!("expected PermissionDenied, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_day_produces_an_empty_plan() -> eyre::Result<()> {
    let harness = harness();
    seed_technician(&harness, &[]).await?;

    let plan = harness
        .service
        .plan_for_date(&dispatcher(), service_date(), request()?)
        .await?;

    ensure!(plan.routes().is_empty());
    ensure!(plan.unassigned().is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_estimator_falls_back_to_great_circle() -> eyre::Result<()> {
    let harness = harness_with_estimator(Arc::new(DownEstimator));
    seed_technician(&harness, &[]).await?;
    let customer = seed_customer(&harness, Some(point(47.05, 8.05)?)).await?;
    seed_job(&harness, &customer, &[], 45).await?;

    let plan = harness
        .service
        .plan_for_date(
            &dispatcher(),
            service_date(),
            request()?.with_mode(OptimizeMode::Time),
        )
        .await?;

    ensure!(plan.routes().len() == 1, "fallback should still route");
    ensure!(
        plan.routes()
            .iter()
            .all(|route| route.metrics().distance_meters > 0)
    );
    Ok(())
}

#[tokio::test]
async fn skill_mismatches_surface_as_unassigned() -> eyre::Result<()> {
    let harness = harness();
    seed_technician(&harness, &["hvac"]).await?;
    let customer = seed_customer(&harness, Some(point(47.02, 8.02)?)).await?;
    let exotic = seed_job(&harness, &customer, &["crane_rigging"], 45).await?;

    let plan = harness
        .service
        .plan_for_date(&dispatcher(), service_date(), request()?)
        .await?;

    ensure!(plan.routes().is_empty());
    ensure!(plan.unassigned().iter().all(|item| {
        item.job_id == exotic.id() && item.reason == UnassignedReason::NoCapableTechnician
    }));
    Ok(())
}

#[tokio::test]
async fn planning_leaves_an_audit_record() -> eyre::Result<()> {
    let harness = harness();
    seed_technician(&harness, &[]).await?;
    let customer = seed_customer(&harness, Some(point(47.02, 8.02)?)).await?;
    seed_job(&harness, &customer, &[], 60).await?;

    let actor = dispatcher();
    harness
        .service
        .plan_for_date(&actor, service_date(), request()?)
        .await?;

    let entries = harness
        .audit
        .list(
            &ActionLogQuery::all().by_actor(actor.user_id()),
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await?;
    ensure!(entries.total() == 1);
    ensure!(
        entries
            .items()
            .iter()
            .all(|entry| entry.action().as_str() == "route.plan")
    );
    Ok(())
}
