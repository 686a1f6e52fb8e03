//! Full dispatch planning flow: intake to route sheet.

use crate::helpers::{admin, app};
use chrono::NaiveDate;
use eyre::ensure;
use fieldline::customer::services::RegisterCustomerRequest;
use fieldline::dispatch::domain::{OptimizeMode, RouteOrdering};
use fieldline::dispatch::services::{PlanRequest, RouteSheetRenderer};
use fieldline::geo::GeoPoint;
use fieldline::identity::domain::{AuthenticatedPrincipal, UserRole};
use fieldline::identity::services::CreateUserRequest;
use fieldline::job::domain::ServiceType;
use fieldline::job::services::ScheduleJobRequest;
use mockable::DefaultClock;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

fn depot() -> eyre::Result<GeoPoint> {
    GeoPoint::new(47.3769, 8.5417).map_err(|err| eyre::eyre!(err))
}

#[tokio::test]
async fn planned_day_produces_persisted_routes_and_a_sheet() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

    let technician = app
        .users
        .create_user(
            &seed,
            CreateUserRequest::new(
                "Tess Technician",
                "tess@example.com",
                UserRole::Technician,
                "a-strong-password",
            ),
        )
        .await?;
    let dispatcher = app
        .users
        .create_user(
            &seed,
            CreateUserRequest::new(
                "Dana Dispatcher",
                "dana@example.com",
                UserRole::Dispatcher,
                "a-strong-password",
            ),
        )
        .await?;
    let dispatcher = AuthenticatedPrincipal::new(dispatcher.id(), dispatcher.role());

    // Three customer sites spread across town, all geocoded.
    let mut job_ids = Vec::new();
    for (index, (lat, lng)) in [(47.39, 8.52), (47.36, 8.56), (47.40, 8.58)]
        .into_iter()
        .enumerate()
    {
        let customer = app
            .customers
            .register(
                &dispatcher,
                RegisterCustomerRequest::new(
                    format!("Customer {index}"),
                    "1 Main St",
                    "Zurich",
                    "ZH",
                    "8001",
                ),
            )
            .await?;
        app.customers
            .set_coordinates(&dispatcher, customer.id(), lat, lng)
            .await?;

        let job = app
            .jobs
            .schedule(
                &dispatcher,
                ScheduleJobRequest::new(
                    format!("Visit {index}"),
                    customer.id(),
                    ServiceType::Maintenance,
                    date(),
                    40,
                ),
            )
            .await?;
        job_ids.push(job.id());
    }

    // The technician reported a position this morning; planning uses it
    // as the route start instead of the depot.
    app.tracking
        .publish(
            technician.id(),
            GeoPoint::new(47.38, 8.53).map_err(|err| eyre::eyre!(err))?,
            &DefaultClock,
        )
        .map_err(|err| eyre::eyre!(err))?;

    let plan = app
        .planning
        .plan_for_date(
            &dispatcher,
            date(),
            PlanRequest::new(depot()?).with_mode(OptimizeMode::Time),
        )
        .await?;

    ensure!(plan.routes().len() == 1);
    let route = plan
        .routes()
        .first()
        .ok_or_else(|| eyre::eyre!("expected a route"))?;
    ensure!(route.technician() == technician.id());
    ensure!(route.ordering() == RouteOrdering::Optimized);
    ensure!(route.stops().len() == 3);
    ensure!(route.metrics().service_minutes == 120);
    ensure!(plan.unassigned().is_empty());

    // Every scheduled job appears exactly once across the plan.
    let mut planned: Vec<_> = route
        .stops()
        .iter()
        .map(|stop| stop.stop.job_id())
        .collect();
    planned.sort_by_key(ToString::to_string);
    let mut expected = job_ids.clone();
    expected.sort_by_key(ToString::to_string);
    ensure!(planned == expected);

    // The persisted plan matches what was returned.
    let stored = app
        .planning
        .plan_for_technician(technician.id(), date())
        .await?
        .ok_or_else(|| eyre::eyre!("plan should be persisted"))?;
    ensure!(stored.stops().len() == 3);

    // And the sheet renders the whole thing for the dispatcher.
    let sheet = RouteSheetRenderer::new().render(&plan)?;
    ensure!(sheet.contains("Tess Technician"));
    ensure!(sheet.contains("3 stops"));
    for job_id in &job_ids {
        ensure!(sheet.contains(&job_id.to_string()));
    }
    Ok(())
}
