//! Diesel customer repository tests against embedded `PostgreSQL`.

use super::harness::embedded_db;
use eyre::ensure;
use fieldline::customer::adapters::PostgresCustomerRepository;
use fieldline::customer::domain::{Customer, CustomerName, PostalAddress};
use fieldline::customer::ports::CustomerRepository;
use fieldline::geo::GeoPoint;
use mockable::DefaultClock;

fn customer(name: &str) -> eyre::Result<Customer> {
    Ok(Customer::register(
        CustomerName::new(name).map_err(|err| eyre::eyre!(err))?,
        PostalAddress::new("1 Main St", "Springfield", "IL", "62701")
            .map_err(|err| eyre::eyre!(err))?,
        &DefaultClock,
    ))
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn coordinates_survive_the_round_trip() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresCustomerRepository::new(db.pool.clone());

    let mut stored = customer("Acme Utilities")?;
    repository.store(&stored).await?;

    let blank = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre::eyre!("customer should exist"))?;
    ensure!(blank.coordinates().is_none());

    let position = GeoPoint::new(39.7817, -89.6501).map_err(|err| eyre::eyre!(err))?;
    stored.set_coordinates(position, &DefaultClock);
    repository.update(&stored).await?;

    let geocoded = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre::eyre!("customer should exist"))?;
    ensure!(geocoded.coordinates() == Some(position));
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn prefix_search_is_case_insensitive_and_escaped() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let repository = PostgresCustomerRepository::new(db.pool.clone());

    repository.store(&customer("Acme Utilities")?).await?;
    repository.store(&customer("Acme Water")?).await?;
    repository.store(&customer("100% Clean Co")?).await?;

    let matches = repository.search_by_name_prefix("acme").await?;
    ensure!(matches.len() == 2);

    // A literal percent in the prefix must not act as a wildcard.
    let odd = repository.search_by_name_prefix("100%").await?;
    ensure!(odd.len() == 1);
    let none = repository.search_by_name_prefix("%").await?;
    ensure!(none.is_empty(), "wildcard leaked into LIKE");
    Ok(())
}
