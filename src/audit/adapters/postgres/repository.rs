//! `PostgreSQL` implementation of the append-only action log.

use super::{
    models::{ActionLogRow, NewActionLogRow},
    schema::action_logs,
};
use crate::audit::domain::{
    ActionLogEntry, ActionLogId, ActionName, PersistedActionLogData, RequestOrigin, ResourceKind,
};
use crate::audit::ports::{
    ActionLogQuery, ActionLogRepository, ActionLogRepositoryError, ActionLogRepositoryResult,
};
use crate::identity::domain::UserId;
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by audit adapters.
pub type ActionLogPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed action log.
#[derive(Debug, Clone)]
pub struct PostgresActionLog {
    pool: ActionLogPgPool,
}

impl PostgresActionLog {
    /// Creates a new action log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ActionLogPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ActionLogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ActionLogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ActionLogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ActionLogRepositoryError::persistence)?
    }
}

#[async_trait]
impl ActionLogRepository for PostgresActionLog {
    async fn append(&self, entry: &ActionLogEntry) -> ActionLogRepositoryResult<()> {
        let entry_id = entry.id();
        let new_row = to_new_row(entry);

        self.run_blocking(move |connection| {
            diesel::insert_into(action_logs::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ActionLogRepositoryError::DuplicateEntry(entry_id)
                    }
                    _ => ActionLogRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list(
        &self,
        query: &ActionLogQuery,
        page: PageRequest,
    ) -> ActionLogRepositoryResult<Page<ActionLogEntry>> {
        let filter = query.clone();
        self.run_blocking(move |connection| {
            let total: i64 = filtered(&filter)
                .count()
                .get_result(connection)
                .map_err(ActionLogRepositoryError::persistence)?;

            let rows = filtered(&filter)
                .order((action_logs::recorded_at.desc(), action_logs::id.asc()))
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .limit(i64::from(page.size()))
                .select(ActionLogRow::as_select())
                .load::<ActionLogRow>(connection)
                .map_err(ActionLogRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_entry)
                .collect::<ActionLogRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, total.unsigned_abs(), page))
        })
        .await
    }
}

type BoxedQuery<'a> = action_logs::BoxedQuery<'a, diesel::pg::Pg>;

fn filtered(query: &ActionLogQuery) -> BoxedQuery<'_> {
    let mut statement = action_logs::table.into_boxed();
    if let Some(actor) = query.actor {
        statement = statement.filter(action_logs::actor_id.eq(actor.into_inner()));
    }
    if let Some(kind) = query.resource_kind {
        statement = statement.filter(action_logs::resource_kind.eq(kind.as_str()));
    }
    if let Some(after) = query.recorded_after {
        statement = statement.filter(action_logs::recorded_at.ge(after));
    }
    if let Some(before) = query.recorded_before {
        statement = statement.filter(action_logs::recorded_at.lt(before));
    }
    statement
}

fn to_new_row(entry: &ActionLogEntry) -> NewActionLogRow {
    NewActionLogRow {
        id: entry.id().into_inner(),
        actor_id: entry.actor().into_inner(),
        action: entry.action().as_str().to_owned(),
        resource_kind: entry.resource_kind().as_str().to_owned(),
        resource_id: entry.resource_id().map(str::to_owned),
        details: entry.details().clone(),
        origin_ip: entry.origin().ip.clone(),
        user_agent: entry.origin().user_agent.clone(),
        recorded_at: entry.recorded_at(),
    }
}

fn row_to_entry(row: ActionLogRow) -> ActionLogRepositoryResult<ActionLogEntry> {
    let ActionLogRow {
        id,
        actor_id,
        action: persisted_action,
        resource_kind: persisted_kind,
        resource_id,
        details,
        origin_ip,
        user_agent,
        recorded_at,
    } = row;

    let action =
        ActionName::new(persisted_action).map_err(ActionLogRepositoryError::persistence)?;
    let resource_kind = ResourceKind::try_from(persisted_kind.as_str())
        .map_err(ActionLogRepositoryError::persistence)?;

    let mut origin = RequestOrigin::empty();
    if let Some(ip) = origin_ip {
        origin = origin.with_ip(ip);
    }
    if let Some(agent) = user_agent {
        origin = origin.with_user_agent(agent);
    }

    let data = PersistedActionLogData {
        id: ActionLogId::from_uuid(id),
        actor: UserId::from_uuid(actor_id),
        action,
        resource_kind,
        resource_id,
        details,
        origin,
        recorded_at,
    };
    Ok(ActionLogEntry::from_persisted(data))
}
