//! Diesel job repository tests against embedded `PostgreSQL`.

use super::harness::{EmbeddedDb, embedded_db};
use chrono::NaiveDate;
use eyre::{bail, ensure};
use fieldline::customer::adapters::PostgresCustomerRepository;
use fieldline::customer::domain::{Customer, CustomerId, CustomerName, PostalAddress};
use fieldline::customer::ports::CustomerRepository;
use fieldline::identity::adapters::PostgresUserRepository;
use fieldline::identity::domain::{
    DisplayName, EmailAddress, PasswordHash, UserAccount, UserId, UserRole,
};
use fieldline::identity::ports::UserRepository;
use fieldline::job::adapters::PostgresJobRepository;
use fieldline::job::domain::{
    EstimatedDuration, Job, JobName, JobPriority, JobStatus, NewJobData, ServiceType,
};
use fieldline::job::ports::{JobRepository, JobRepositoryError};
use fieldline::page::PageRequest;
use mockable::DefaultClock;

const DIGEST: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default()
}

async fn seed_customer(db: &EmbeddedDb) -> eyre::Result<CustomerId> {
    let repository = PostgresCustomerRepository::new(db.pool.clone());
    let customer = Customer::register(
        CustomerName::new("Acme Utilities").map_err(|err| eyre::eyre!(err))?,
        PostalAddress::new("1 Main St", "Springfield", "IL", "62701")
            .map_err(|err| eyre::eyre!(err))?,
        &DefaultClock,
    );
    repository.store(&customer).await?;
    Ok(customer.id())
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

fn job(customer_id: CustomerId, name: &str, scheduled: NaiveDate) -> eyre::Result<Job> {
    Ok(Job::schedule(
        NewJobData {
            name: JobName::new(name).map_err(|err| eyre::eyre!(err))?,
            description: Some("integration".to_owned()),
            customer_id,
            service_type: ServiceType::Maintenance,
            priority: JobPriority::Medium,
            scheduled_date: scheduled,
            duration: EstimatedDuration::from_minutes(45).map_err(|err| eyre::eyre!(err))?,
            required_skills: Vec::new(),
        },
        &DefaultClock,
    ))
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn store_and_reload_preserves_the_aggregate() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let customer_id = seed_customer(&db).await?;
    let repository = PostgresJobRepository::new(db.pool.clone());

    let stored = job(customer_id, "Round trip", date())?;
    repository.store(&stored).await?;

    let reloaded = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre::eyre!("job should exist"))?;
    ensure!(reloaded.name() == stored.name());
    ensure!(reloaded.customer_id() == customer_id);
    ensure!(reloaded.service_type() == stored.service_type());
    ensure!(reloaded.status() == stored.status());
    ensure!(reloaded.scheduled_date() == stored.scheduled_date());
    ensure!(reloaded.duration() == stored.duration());
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn dangling_customer_reference_violates_the_foreign_key() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresJobRepository::new(db.pool.clone());

    let orphan = job(CustomerId::new(), "Orphan", date())?;
    match repository.store(&orphan).await {
        Err(JobRepositoryError::Persistence(_)) => Ok(()),
        other => bail!("expected a foreign key failure, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn lifecycle_updates_round_trip() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let customer_id = seed_customer(&db).await?;
    let technician = seed_technician(&db).await?;
    let repository = PostgresJobRepository::new(db.pool.clone());

    let mut stored = job(customer_id, "Lifecycle", date())?;
    repository.store(&stored).await?;

    stored
        .assign_technician(technician, &DefaultClock)
        .map_err(|err| eyre::eyre!(err))?;
    stored
        .transition_to(JobStatus::InProgress, &DefaultClock)
        .map_err(|err| eyre::eyre!(err))?;
    repository.update(&stored).await?;

    let reloaded = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre::eyre!("job should exist"))?;
    ensure!(reloaded.status() == JobStatus::InProgress);
    ensure!(reloaded.technician() == Some(technician));

    let day = repository.find_by_technician_on(technician, date()).await?;
    ensure!(day.len() == 1);
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn schedulable_query_filters_status_and_date() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let customer_id = seed_customer(&db).await?;
    let repository = PostgresJobRepository::new(db.pool.clone());

    let pending_today = job(customer_id, "Pending today", date())?;
    let other_day = job(
        customer_id,
        "Pending tomorrow",
        date().succ_opt().unwrap_or(date()),
    )?;
    let mut cancelled = job(customer_id, "Cancelled today", date())?;
    cancelled
        .transition_to(JobStatus::Cancelled, &DefaultClock)
        .map_err(|err| eyre::eyre!(err))?;

    repository.store(&pending_today).await?;
    repository.store(&other_day).await?;
    repository.store(&cancelled).await?;

    let schedulable = repository.find_schedulable_for(date()).await?;
    ensure!(schedulable.len() == 1);
    ensure!(schedulable.iter().all(|j| j.id() == pending_today.id()));
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn pagination_never_repeats_ids() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let customer_id = seed_customer(&db).await?;
    let repository = PostgresJobRepository::new(db.pool.clone());

    for index in 0..7 {
        repository
            .store(&job(customer_id, &format!("Job {index}"), date())?)
            .await?;
    }

    let mut seen = std::collections::HashSet::new();
    for number in 1..=3 {
        let page = repository
            .list(PageRequest::new(number, 3).map_err(|err| eyre::eyre!(err))?)
            .await?;
        ensure!(page.total() == 7);
        for item in page.items() {
            ensure!(seen.insert(item.id()), "page overlap on {}", item.id());
        }
    }
    ensure!(seen.len() == 7);
    Ok(())
}
