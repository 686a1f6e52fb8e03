//! Diesel user repository tests against embedded `PostgreSQL`.

use super::harness::embedded_db;
use eyre::{bail, ensure};
use fieldline::identity::adapters::PostgresUserRepository;
use fieldline::identity::domain::{
    DisplayName, EmailAddress, PasswordHash, SkillTag, UserAccount, UserRole,
};
use fieldline::identity::ports::{UserRepository, UserRepositoryError};
use fieldline::page::PageRequest;
use mockable::DefaultClock;

/// Pre-computed digest so the suite does not pay bcrypt cost per row.
const DIGEST: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

fn account(email: &str, role: UserRole) -> eyre::Result<UserAccount> {
    Ok(UserAccount::register(
        DisplayName::new("Postgres User").map_err(|err| eyre::eyre!(err))?,
        EmailAddress::new(email).map_err(|err| eyre::eyre!(err))?,
        role,
        PasswordHash::from_digest(DIGEST),
        &DefaultClock,
    ))
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn store_and_find_round_trips() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresUserRepository::new(db.pool.clone());

    let mut stored = account("roundtrip@example.com", UserRole::Technician)?;
    stored.set_skills(
        vec![SkillTag::new("hvac").map_err(|err| eyre::eyre!(err))?],
        &DefaultClock,
    );
    repository.store(&stored).await?;

    // Timestamps round-trip at microsecond precision, so compare fields
    // rather than whole aggregates.
    let by_id = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre::eyre!("id lookup should hit"))?;
    ensure!(by_id.email() == stored.email());
    ensure!(by_id.role() == stored.role());
    ensure!(by_id.password() == stored.password());

    let by_email = repository
        .find_by_email(stored.email())
        .await?
        .ok_or_else(|| eyre::eyre!("email lookup should hit"))?;
    ensure!(by_email.id() == stored.id());
    ensure!(by_email.skills().len() == 1);
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn duplicate_email_maps_to_the_unique_constraint() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresUserRepository::new(db.pool.clone());

    repository
        .store(&account("taken@example.com", UserRole::Manager)?)
        .await?;

    match repository
        .store(&account("taken@example.com", UserRole::Dispatcher)?)
        .await
    {
        Err(UserRepositoryError::DuplicateEmail(email)) => {
            ensure!(email.as_str() == "taken@example.com");
            Ok(())
        }
        other => bail!("expected DuplicateEmail, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn update_persists_mutations_and_rejects_ghosts() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresUserRepository::new(db.pool.clone());

    let mut stored = account("mutable@example.com", UserRole::Dispatcher)?;
    repository.store(&stored).await?;

    stored.change_role(UserRole::Manager, &DefaultClock);
    stored.record_login(&DefaultClock);
    repository.update(&stored).await?;

    let reloaded = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre::eyre!("account should exist"))?;
    ensure!(reloaded.role() == UserRole::Manager);
    ensure!(reloaded.last_login().is_some());

    let ghost = account("ghost@example.com", UserRole::Technician)?;
    match repository.update(&ghost).await {
        Err(UserRepositoryError::NotFound(id)) if id == ghost.id() => Ok(()),
        other => bail!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn listing_pages_are_stable_and_disjoint() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresUserRepository::new(db.pool.clone());

    for index in 0..5 {
        repository
            .store(&account(
                &format!("page{index}@example.com"),
                UserRole::Dispatcher,
            )?)
            .await?;
    }

    let mut seen = std::collections::HashSet::new();
    for number in 1..=3 {
        let page = repository
            .list(PageRequest::new(number, 2).map_err(|err| eyre::eyre!(err))?)
            .await?;
        ensure!(page.total() == 5);
        for user in page.items() {
            ensure!(seen.insert(user.id()), "page overlap on {}", user.id());
        }
    }
    ensure!(seen.len() == 5);
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn technician_listing_filters_role_and_status() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresUserRepository::new(db.pool.clone());

    let active = account("active-tech@example.com", UserRole::Technician)?;
    let mut inactive = account("inactive-tech@example.com", UserRole::Technician)?;
    inactive.deactivate(&DefaultClock);
    let desk = account("desk@example.com", UserRole::Dispatcher)?;

    repository.store(&active).await?;
    repository.store(&inactive).await?;
    repository.store(&desk).await?;

    let technicians = repository.list_active_technicians().await?;
    ensure!(technicians.len() == 1);
    ensure!(technicians.iter().all(|t| t.id() == active.id()));
    Ok(())
}
