//! Job intake, assignment, and progress flows across contexts.

use crate::helpers::{admin, app};
use chrono::NaiveDate;
use eyre::{bail, ensure};
use fieldline::audit::domain::{RequestOrigin, ResourceKind};
use fieldline::audit::ports::ActionLogQuery;
use fieldline::customer::services::RegisterCustomerRequest;
use fieldline::identity::domain::{AuthenticatedPrincipal, UserRole};
use fieldline::identity::services::CreateUserRequest;
use fieldline::job::domain::{JobStatus, ServiceType};
use fieldline::job::services::ScheduleJobRequest;
use fieldline::page::PageRequest;
use serde_json::json;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

#[tokio::test]
async fn a_job_travels_from_intake_to_completion() -> eyre::Result<()> {
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
            )
            .with_skills(["metering".to_owned()]),
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

    let customer = app
        .customers
        .register(
            &dispatcher,
            RegisterCustomerRequest::new("Acme Utilities", "1 Main St", "Springfield", "IL", "62701"),
        )
        .await?;

    let job = app
        .jobs
        .schedule(
            &dispatcher,
            ScheduleJobRequest::new(
                "Meter swap",
                customer.id(),
                ServiceType::Replacement,
                date(),
                45,
            )
            .with_required_skills(["metering".to_owned()]),
        )
        .await?;
    ensure!(job.status() == JobStatus::Pending);

    let assigned = app
        .jobs
        .assign_technician(&dispatcher, job.id(), technician.id())
        .await?;
    ensure!(assigned.technician() == Some(technician.id()));

    // The technician works the visit to completion.
    let tech_actor = AuthenticatedPrincipal::new(technician.id(), UserRole::Technician);
    app.jobs
        .transition(&tech_actor, job.id(), JobStatus::InProgress)
        .await?;
    let done = app
        .jobs
        .transition(&tech_actor, job.id(), JobStatus::Completed)
        .await?;
    ensure!(done.status() == JobStatus::Completed);

    // Completed work shows up in the technician's day listing.
    let day = app.jobs.technician_day(technician.id(), date()).await?;
    ensure!(day.len() == 1);
    Ok(())
}

#[tokio::test]
async fn audit_trail_captures_job_actions_for_admins_only() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

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
    let dispatcher_actor = AuthenticatedPrincipal::new(dispatcher.id(), dispatcher.role());

    app.audit
        .record(
            dispatcher.id(),
            "job.create",
            ResourceKind::Job,
            Some("job-42".to_owned()),
            json!({"priority": "high"}),
            RequestOrigin::empty().with_ip("203.0.113.9"),
        )
        .await?;

    // Admins can read the trail.
    let listing = app
        .audit
        .list(
            &seed,
            &ActionLogQuery::all().by_resource_kind(ResourceKind::Job),
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await?;
    ensure!(listing.total() == 1);

    // The dispatcher who generated the entry cannot.
    match app
        .audit
        .list(
            &dispatcher_actor,
            &ActionLogQuery::all(),
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await
    {
        Err(_) => Ok(()),
        Ok(_) => bail!("non-admin read the audit trail"),
    }
}

#[tokio::test]
async fn cancelled_jobs_drop_out_of_the_schedulable_pool() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

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

    let customer = app
        .customers
        .register(
            &dispatcher,
            RegisterCustomerRequest::new("Borealis Gas", "2 Side St", "Springfield", "IL", "62702"),
        )
        .await?;

    let keep = app
        .jobs
        .schedule(
            &dispatcher,
            ScheduleJobRequest::new("Keep", customer.id(), ServiceType::Maintenance, date(), 30),
        )
        .await?;
    let cancel = app
        .jobs
        .schedule(
            &dispatcher,
            ScheduleJobRequest::new("Cancel", customer.id(), ServiceType::Training, date(), 30),
        )
        .await?;
    app.jobs
        .transition(&dispatcher, cancel.id(), JobStatus::Cancelled)
        .await?;

    let pending = app
        .jobs
        .list_by_status(
            JobStatus::Pending,
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await?;
    ensure!(pending.total() == 1);
    ensure!(pending.items().iter().all(|job| job.id() == keep.id()));

    // The cancelled job still exists; nothing is hard-deleted.
    let stored = app.jobs.find(cancel.id()).await?;
    ensure!(stored.as_ref().is_some_and(|job| job.status() == JobStatus::Cancelled));
    Ok(())
}
