//! `PostgreSQL` repository implementation for job storage.

use super::{
    models::{JobRow, NewJobRow},
    schema::jobs,
};
use crate::customer::domain::CustomerId;
use crate::identity::domain::{SkillTag, UserId};
use crate::job::domain::{
    EstimatedDuration, Job, JobId, JobName, JobPriority, JobStatus, PersistedJobData, ServiceType,
};
use crate::job::ports::{JobRepository, JobRepositoryError, JobRepositoryResult};
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by job adapters.
pub type JobPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed job repository.
#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: JobPgPool,
}

impl PostgresJobRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: JobPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> JobRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> JobRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(JobRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(JobRepositoryError::persistence)?
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let new_row = to_new_row(job)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(jobs::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRepositoryError::DuplicateJob(job_id)
                    }
                    _ => JobRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = to_new_row(job)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(jobs::table.filter(jobs::id.eq(job_id.into_inner())))
                .set((
                    jobs::name.eq(&row.name),
                    jobs::description.eq(&row.description),
                    jobs::service_type.eq(&row.service_type),
                    jobs::priority.eq(&row.priority),
                    jobs::status.eq(&row.status),
                    jobs::technician_id.eq(row.technician_id),
                    jobs::scheduled_date.eq(row.scheduled_date),
                    jobs::estimated_minutes.eq(row.estimated_minutes),
                    jobs::required_skills.eq(&row.required_skills),
                    jobs::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(JobRepositoryError::persistence)?;

            if affected == 0 {
                return Err(JobRepositoryError::NotFound(job_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        self.run_blocking(move |connection| {
            let row = jobs::table
                .filter(jobs::id.eq(id.into_inner()))
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()
                .map_err(JobRepositoryError::persistence)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn list(&self, page: PageRequest) -> JobRepositoryResult<Page<Job>> {
        self.run_blocking(move |connection| {
            let total: i64 = jobs::table
                .count()
                .get_result(connection)
                .map_err(JobRepositoryError::persistence)?;

            let rows = jobs::table
                .order((jobs::scheduled_date.asc(), jobs::id.asc()))
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .limit(i64::from(page.size()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_job)
                .collect::<JobRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, total.unsigned_abs(), page))
        })
        .await
    }

    async fn list_by_status(
        &self,
        status: JobStatus,
        page: PageRequest,
    ) -> JobRepositoryResult<Page<Job>> {
        self.run_blocking(move |connection| {
            let total: i64 = jobs::table
                .filter(jobs::status.eq(status.as_str()))
                .count()
                .get_result(connection)
                .map_err(JobRepositoryError::persistence)?;

            let rows = jobs::table
                .filter(jobs::status.eq(status.as_str()))
                .order((jobs::scheduled_date.asc(), jobs::id.asc()))
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .limit(i64::from(page.size()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_job)
                .collect::<JobRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, total.unsigned_abs(), page))
        })
        .await
    }

    async fn find_schedulable_for(&self, date: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        self.run_blocking(move |connection| {
            let rows = jobs::table
                .filter(jobs::status.eq(JobStatus::Pending.as_str()))
                .filter(jobs::scheduled_date.eq(date))
                .order((jobs::scheduled_date.asc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;

            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }

    async fn find_by_technician_on(
        &self,
        technician: UserId,
        date: NaiveDate,
    ) -> JobRepositoryResult<Vec<Job>> {
        self.run_blocking(move |connection| {
            let rows = jobs::table
                .filter(jobs::technician_id.eq(technician.into_inner()))
                .filter(jobs::scheduled_date.eq(date))
                .order((jobs::scheduled_date.asc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;

            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }
}

fn to_new_row(job: &Job) -> JobRepositoryResult<NewJobRow> {
    let required_skills =
        serde_json::to_value(job.required_skills()).map_err(JobRepositoryError::persistence)?;
    let estimated_minutes =
        i32::try_from(job.duration().minutes()).map_err(JobRepositoryError::persistence)?;

    Ok(NewJobRow {
        id: job.id().into_inner(),
        name: job.name().as_str().to_owned(),
        description: job.description().map(str::to_owned),
        customer_id: job.customer_id().into_inner(),
        service_type: job.service_type().as_str().to_owned(),
        priority: job.priority().as_str().to_owned(),
        status: job.status().as_str().to_owned(),
        technician_id: job.technician().map(UserId::into_inner),
        scheduled_date: job.scheduled_date(),
        estimated_minutes,
        required_skills,
        created_at: job.created_at(),
        updated_at: job.updated_at(),
    })
}

fn row_to_job(row: JobRow) -> JobRepositoryResult<Job> {
    let JobRow {
        id,
        name,
        description,
        customer_id,
        service_type: persisted_service_type,
        priority: persisted_priority,
        status: persisted_status,
        technician_id,
        scheduled_date,
        estimated_minutes,
        required_skills: persisted_skills,
        created_at,
        updated_at,
    } = row;

    let name = JobName::new(name).map_err(JobRepositoryError::persistence)?;
    let service_type = ServiceType::try_from(persisted_service_type.as_str())
        .map_err(JobRepositoryError::persistence)?;
    let priority = JobPriority::try_from(persisted_priority.as_str())
        .map_err(JobRepositoryError::persistence)?;
    let status =
        JobStatus::try_from(persisted_status.as_str()).map_err(JobRepositoryError::persistence)?;
    let minutes = u32::try_from(estimated_minutes).map_err(JobRepositoryError::persistence)?;
    let duration =
        EstimatedDuration::from_minutes(minutes).map_err(JobRepositoryError::persistence)?;
    let required_skills = serde_json::from_value::<Vec<SkillTag>>(persisted_skills)
        .map_err(JobRepositoryError::persistence)?;

    let data = PersistedJobData {
        id: JobId::from_uuid(id),
        name,
        description,
        customer_id: CustomerId::from_uuid(customer_id),
        service_type,
        priority,
        status,
        technician: technician_id.map(UserId::from_uuid),
        scheduled_date,
        duration,
        required_skills,
        created_at,
        updated_at,
    };
    Ok(Job::from_persisted(data))
}
