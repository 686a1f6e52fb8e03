//! Diesel action log tests against embedded `PostgreSQL`.

use super::harness::embedded_db;
use eyre::ensure;
use fieldline::audit::adapters::PostgresActionLog;
use fieldline::audit::domain::{ActionLogEntry, ActionName, RequestOrigin, ResourceKind};
use fieldline::audit::ports::{ActionLogQuery, ActionLogRepository};
use fieldline::identity::domain::UserId;
use fieldline::page::PageRequest;
use mockable::DefaultClock;
use serde_json::json;

fn entry(actor: UserId, action: &str, kind: ResourceKind) -> eyre::Result<ActionLogEntry> {
    Ok(ActionLogEntry::record(
        actor,
        ActionName::new(action).map_err(|err| eyre::eyre!(err))?,
        kind,
        Some("resource-1".to_owned()),
        json!({"source": "integration"}),
        RequestOrigin::empty()
            .with_ip("198.51.100.4")
            .with_user_agent("fieldline-tests/1.0"),
        &DefaultClock,
    ))
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn appended_entries_come_back_newest_first() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let log = PostgresActionLog::new(db.pool.clone());
    let actor = UserId::new();

    log.append(&entry(actor, "job.create", ResourceKind::Job)?).await?;
    log.append(&entry(actor, "job.assign", ResourceKind::Job)?).await?;

    let listing = log
        .list(
            &ActionLogQuery::all(),
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await?;
    ensure!(listing.total() == 2);

    let newest = listing
        .items()
        .first()
        .ok_or_else(|| eyre::eyre!("expected entries"))?;
    ensure!(newest.action().as_str() == "job.assign");
    ensure!(newest.origin().ip.as_deref() == Some("198.51.100.4"));
    Ok(())
}

#[tokio::test]
#[ignore = "boots embedded PostgreSQL"]
async fn filters_restrict_by_actor_and_kind() -> eyre::Result<()> {
    let db = embedded_db().await?;
    let log = PostgresActionLog::new(db.pool.clone());
    let alice = UserId::new();
    let bob = UserId::new();

    log.append(&entry(alice, "customer.create", ResourceKind::Customer)?)
        .await?;
    log.append(&entry(bob, "route.plan", ResourceKind::RoutePlan)?)
        .await?;

    let by_actor = log
        .list(
            &ActionLogQuery::all().by_actor(alice),
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await?;
    ensure!(by_actor.total() == 1);
    ensure!(by_actor.items().iter().all(|e| e.actor() == alice));

    let by_kind = log
        .list(
            &ActionLogQuery::all().by_resource_kind(ResourceKind::RoutePlan),
            PageRequest::new(1, 10).map_err(|err| eyre::eyre!(err))?,
        )
        .await?;
    ensure!(by_kind.total() == 1);
    ensure!(
        by_kind
            .items()
            .iter()
            .all(|e| e.resource_kind() == ResourceKind::RoutePlan)
    );
    Ok(())
}
