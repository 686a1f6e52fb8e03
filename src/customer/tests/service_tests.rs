//! Unit tests for the customer directory service.

use crate::customer::adapters::InMemoryCustomerRepository;
use crate::customer::services::{
    CustomerDirectoryService, CustomerServiceError, RegisterCustomerRequest,
};
use crate::identity::domain::{AuthenticatedPrincipal, UserId, UserRole};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

type Service = CustomerDirectoryService<InMemoryCustomerRepository, DefaultClock>;

#[fixture]
fn directory() -> Service {
    CustomerDirectoryService::new(
        Arc::new(InMemoryCustomerRepository::new()),
        Arc::new(DefaultClock),
    )
}

fn dispatcher() -> AuthenticatedPrincipal {
    AuthenticatedPrincipal::new(UserId::new(), UserRole::Dispatcher)
}

fn request(name: &str) -> RegisterCustomerRequest {
    RegisterCustomerRequest::new(name, "1 Main St", "Springfield", "IL", "62701")
}

#[rstest]
#[tokio::test]
async fn register_and_find_round_trips(directory: Service) -> eyre::Result<()> {
    let actor = dispatcher();
    let created = directory.register(&actor, request("Acme Utilities")).await?;

    let found = directory.find(created.id()).await?;
    let found = found.ok_or_else(|| eyre::eyre!("customer should be found"))?;
    ensure!(found.name().as_str() == "Acme Utilities");
    ensure!(found.coordinates().is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn technicians_cannot_register_customers(directory: Service) -> eyre::Result<()> {
    let actor = AuthenticatedPrincipal::new(UserId::new(), UserRole::Technician);

    match directory.register(&actor, request("Denied Inc")).await {
        Err(CustomerServiceError::PermissionDenied { .. }) => Ok(()),
        other => bail!("expected PermissionDenied, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn set_coordinates_validates_range(directory: Service) -> eyre::Result<()> {
    let actor = dispatcher();
    let created = directory.register(&actor, request("Geo Co")).await?;

    match directory
        .set_coordinates(&actor, created.id(), 123.0, 0.0)
        .await
    {
        Err(CustomerServiceError::Geo(_)) => {}
        other => bail!("expected geo error, got {other:?}"),
    }

    let updated = directory
        .set_coordinates(&actor, created.id(), 39.7817, -89.6501)
        .await?;
    ensure!(updated.coordinates().is_some());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn search_matches_case_insensitive_prefix(directory: Service) -> eyre::Result<()> {
    let actor = dispatcher();
    directory.register(&actor, request("Acme Utilities")).await?;
    directory.register(&actor, request("Acme Water")).await?;
    directory.register(&actor, request("Borealis Gas")).await?;

    let matches = directory.search("acme").await?;
    ensure!(matches.len() == 2);
    ensure!(matches.iter().all(|c| c.name().as_str().starts_with("Acme")));

    let none = directory.search("zenith").await?;
    ensure!(none.is_empty());
    Ok(())
}
