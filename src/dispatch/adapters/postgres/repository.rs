//! `PostgreSQL` repository implementation for route plan storage.

use super::{
    models::{NewRoutePlanRow, RoutePlanRow},
    schema::route_plans,
};
use crate::dispatch::domain::{
    PersistedRoutePlanData, PlannedStop, RouteMetrics, RouteOrdering, RoutePlan, RoutePlanId,
};
use crate::dispatch::ports::{
    RoutePlanRepository, RoutePlanRepositoryError, RoutePlanRepositoryResult,
};
use crate::identity::domain::UserId;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by dispatch adapters.
pub type RoutePlanPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed route plan repository.
#[derive(Debug, Clone)]
pub struct PostgresRoutePlanRepository {
    pool: RoutePlanPgPool,
}

impl PostgresRoutePlanRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: RoutePlanPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RoutePlanRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RoutePlanRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RoutePlanRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RoutePlanRepositoryError::persistence)?
    }
}

#[async_trait]
impl RoutePlanRepository for PostgresRoutePlanRepository {
    async fn save(&self, plan: &RoutePlan) -> RoutePlanRepositoryResult<()> {
        let new_row = to_new_row(plan)?;

        self.run_blocking(move |connection| {
            // One plan per technician and date; a re-plan replaces the
            // previous run wholesale.
            diesel::insert_into(route_plans::table)
                .values(&new_row)
                .on_conflict((route_plans::technician_id, route_plans::service_date))
                .do_update()
                .set((
                    route_plans::id.eq(new_row.id),
                    route_plans::stops.eq(&new_row.stops),
                    route_plans::ordering.eq(&new_row.ordering),
                    route_plans::distance_meters.eq(new_row.distance_meters),
                    route_plans::travel_seconds.eq(new_row.travel_seconds),
                    route_plans::service_minutes.eq(new_row.service_minutes),
                    route_plans::fuel_cost_cents.eq(new_row.fuel_cost_cents),
                    route_plans::created_at.eq(new_row.created_at),
                ))
                .execute(connection)
                .map_err(RoutePlanRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_by_technician_and_date(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> RoutePlanRepositoryResult<Option<RoutePlan>> {
        self.run_blocking(move |connection| {
            let row = route_plans::table
                .filter(route_plans::technician_id.eq(technician.into_inner()))
                .filter(route_plans::service_date.eq(date))
                .select(RoutePlanRow::as_select())
                .first::<RoutePlanRow>(connection)
                .optional()
                .map_err(RoutePlanRepositoryError::persistence)?;
            row.map(row_to_plan).transpose()
        })
        .await
    }

    async fn list_for_date(&self, date: NaiveDate) -> RoutePlanRepositoryResult<Vec<RoutePlan>> {
        self.run_blocking(move |connection| {
            let rows = route_plans::table
                .filter(route_plans::service_date.eq(date))
                .order(route_plans::technician_id.asc())
                .select(RoutePlanRow::as_select())
                .load::<RoutePlanRow>(connection)
                .map_err(RoutePlanRepositoryError::persistence)?;

            rows.into_iter().map(row_to_plan).collect()
        })
        .await
    }
}

fn to_new_row(plan: &RoutePlan) -> RoutePlanRepositoryResult<NewRoutePlanRow> {
    let stops =
        serde_json::to_value(plan.stops()).map_err(RoutePlanRepositoryError::persistence)?;
    let metrics = plan.metrics();

    Ok(NewRoutePlanRow {
        id: plan.id().into_inner(),
        technician_id: plan.technician().into_inner(),
        service_date: plan.service_date(),
        stops,
        ordering: plan.ordering().as_str().to_owned(),
        distance_meters: i64::try_from(metrics.distance_meters)
            .map_err(RoutePlanRepositoryError::persistence)?,
        travel_seconds: i64::try_from(metrics.travel_seconds)
            .map_err(RoutePlanRepositoryError::persistence)?,
        service_minutes: i32::try_from(metrics.service_minutes)
            .map_err(RoutePlanRepositoryError::persistence)?,
        fuel_cost_cents: i64::try_from(metrics.fuel_cost_cents)
            .map_err(RoutePlanRepositoryError::persistence)?,
        created_at: plan.created_at(),
    })
}

fn row_to_plan(row: RoutePlanRow) -> RoutePlanRepositoryResult<RoutePlan> {
    let RoutePlanRow {
        id,
        technician_id,
        service_date,
        stops: persisted_stops,
        ordering: persisted_ordering,
        distance_meters,
        travel_seconds,
        service_minutes,
        fuel_cost_cents,
        created_at,
    } = row;

    let stops = serde_json::from_value::<Vec<PlannedStop>>(persisted_stops)
        .map_err(RoutePlanRepositoryError::persistence)?;
    let ordering = RouteOrdering::try_from(persisted_ordering.as_str())
        .map_err(RoutePlanRepositoryError::persistence)?;
    let metrics = RouteMetrics {
        distance_meters: distance_meters.unsigned_abs(),
        travel_seconds: travel_seconds.unsigned_abs(),
        service_minutes: u32::try_from(service_minutes)
            .map_err(RoutePlanRepositoryError::persistence)?,
        fuel_cost_cents: fuel_cost_cents.unsigned_abs(),
    };

    let data = PersistedRoutePlanData {
        id: RoutePlanId::from_uuid(id),
        technician: UserId::from_uuid(technician_id),
        service_date,
        stops,
        metrics,
        ordering,
        created_at,
    };
    Ok(RoutePlan::from_persisted(data))
}
