//! Diesel route plan repository tests against embedded `PostgreSQL`.

use super::harness::{EmbeddedDb, embedded_db};
use chrono::NaiveDate;
use eyre::ensure;
use fieldline::dispatch::adapters::PostgresRoutePlanRepository;
use fieldline::dispatch::domain::{
    OptimizedRoute, RouteMetrics, RouteOrdering, RoutePlan, ScheduledStop, Stop,
};
use fieldline::dispatch::ports::RoutePlanRepository;
use fieldline::geo::GeoPoint;
use fieldline::identity::adapters::PostgresUserRepository;
use fieldline::identity::domain::{
    DisplayName, EmailAddress, PasswordHash, UserAccount, UserId, UserRole,
};
use fieldline::identity::ports::UserRepository;
use fieldline::job::domain::{JobId, JobPriority};
use mockable::DefaultClock;

const DIGEST: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

async fn seed_technician(db: &EmbeddedDb) -> eyre::Result<UserId> {
    let repository = PostgresUserRepository::new(db.pool.clone());
    let account = UserAccount::register(
        DisplayName::new("Tess Technician").map_err(|err| eyre::eyre!(err))?,
        EmailAddress::new(format!("tech-{}@example.com", UserId::new()))
            .map_err(|err| eyre::eyre!(err))?,
        UserRole::Technician,
        PasswordHash::from_digest(DIGEST),
        &DefaultClock,
    );
    repository.store(&account).await?;
    Ok(account.id())
}

fn plan_for(technician: UserId, stop_count: usize) -> eyre::Result<RoutePlan> {
    let location = GeoPoint::new(47.37, 8.54).map_err(|err| eyre::eyre!(err))?;
    let stops = (0..stop_count)
        .map(|index| ScheduledStop {
            stop: Stop::new(
                JobId::new(),
                location,
                30,
                JobPriority::Medium,
                Vec::new(),
            ),
            arrival_offset_minutes: u32::try_from(index * 40).unwrap_or(u32::MAX),
        })
        .collect();

    let route = OptimizedRoute::new(
        technician,
        "Tess Technician".to_owned(),
        stops,
        RouteMetrics {
            distance_meters: 12_000,
            travel_seconds: 1_800,
            service_minutes: 30 * u32::try_from(stop_count).unwrap_or(0),
            fuel_cost_cents: 205,
        },
        RouteOrdering::Optimized,
    );
    Ok(RoutePlan::from_route(&route, date(), &DefaultClock))
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn save_and_reload_round_trips() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let technician = seed_technician(&db).await?;
    let repository = PostgresRoutePlanRepository::new(db.pool.clone());

    let plan = plan_for(technician, 2)?;
    repository.save(&plan).await?;

    let reloaded = repository
        .find_by_technician_and_date(technician, date())
        .await?
        .ok_or_else(|| eyre::eyre!("plan should exist"))?;
    ensure!(reloaded.id() == plan.id());
    ensure!(reloaded.stops() == plan.stops());
    ensure!(reloaded.metrics() == plan.metrics());
    ensure!(reloaded.ordering() == plan.ordering());

    let listing = repository.list_for_date(date()).await?;
    ensure!(listing.len() == 1);
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn saving_twice_replaces_the_slot() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let technician = seed_technician(&db).await?;
    let repository = PostgresRoutePlanRepository::new(db.pool.clone());

    repository.save(&plan_for(technician, 1)?).await?;
    let replacement = plan_for(technician, 3)?;
    repository.save(&replacement).await?;

    let listing = repository.list_for_date(date()).await?;
    ensure!(listing.len() == 1, "the unique slot must not duplicate");
    ensure!(listing.iter().all(|plan| plan.stops().len() == 3));
    ensure!(listing.iter().all(|plan| plan.id() == replacement.id()));
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn different_technicians_keep_separate_slots() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let first = seed_technician(&db).await?;
    let second = seed_technician(&db).await?;
    let repository = PostgresRoutePlanRepository::new(db.pool.clone());

    repository.save(&plan_for(first, 1)?).await?;
    repository.save(&plan_for(second, 2)?).await?;

    let listing = repository.list_for_date(date()).await?;
    ensure!(listing.len() == 2);
    Ok(())
}
