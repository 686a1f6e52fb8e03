//! `PostgreSQL` repository implementation for user account storage.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::identity::domain::{
    AccountStatus, DisplayName, EmailAddress, PasswordHash, PersistedUserData, SkillTag,
    UserAccount, UserId, UserRole,
};
use crate::identity::ports::{UserRepository, UserRepositoryError, UserRepositoryResult};
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by identity adapters.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: UserPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let account_id = account.id();
        let email = account.email().clone();
        let new_row = to_new_row(account)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        UserRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicateUser(account_id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let account_id = account.id();
        let email = account.email().clone();
        let row = to_new_row(account)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(users::table.filter(users::id.eq(account_id.into_inner())))
                .set((
                    users::display_name.eq(&row.display_name),
                    users::email.eq(&row.email),
                    users::role.eq(&row.role),
                    users::status.eq(&row.status),
                    users::skills.eq(&row.skills),
                    users::password_hash.eq(&row.password_hash),
                    users::last_login.eq(row.last_login),
                    users::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        UserRepositoryError::DuplicateEmail(email.clone())
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;

            if affected == 0 {
                return Err(UserRepositoryError::NotFound(account_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(&lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn list(&self, page: PageRequest) -> UserRepositoryResult<Page<UserAccount>> {
        self.run_blocking(move |connection| {
            let total: i64 = users::table
                .count()
                .get_result(connection)
                .map_err(UserRepositoryError::persistence)?;

            let rows = users::table
                .order((users::created_at.asc(), users::id.asc()))
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .limit(i64::from(page.size()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_account)
                .collect::<UserRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, total.unsigned_abs(), page))
        })
        .await
    }

    async fn list_active_technicians(&self) -> UserRepositoryResult<Vec<UserAccount>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::role.eq(UserRole::Technician.as_str()))
                .filter(users::status.eq(AccountStatus::Active.as_str()))
                .order((users::created_at.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;

            rows.into_iter().map(row_to_account).collect()
        })
        .await
    }
}

fn to_new_row(account: &UserAccount) -> UserRepositoryResult<NewUserRow> {
    let skills =
        serde_json::to_value(account.skills()).map_err(UserRepositoryError::persistence)?;

    Ok(NewUserRow {
        id: account.id().into_inner(),
        display_name: account.name().as_str().to_owned(),
        email: account.email().as_str().to_owned(),
        role: account.role().as_str().to_owned(),
        status: account.status().as_str().to_owned(),
        skills,
        password_hash: account.password().digest().to_owned(),
        last_login: account.last_login(),
        created_at: account.created_at(),
        updated_at: account.updated_at(),
    })
}

fn row_to_account(row: UserRow) -> UserRepositoryResult<UserAccount> {
    let UserRow {
        id,
        display_name,
        email,
        role: persisted_role,
        status: persisted_status,
        skills: persisted_skills,
        password_hash,
        last_login,
        created_at,
        updated_at,
    } = row;

    let name = DisplayName::new(display_name).map_err(UserRepositoryError::persistence)?;
    let email = EmailAddress::new(email).map_err(UserRepositoryError::persistence)?;
    let role =
        UserRole::try_from(persisted_role.as_str()).map_err(UserRepositoryError::persistence)?;
    let status = AccountStatus::try_from(persisted_status.as_str())
        .map_err(UserRepositoryError::persistence)?;
    let skills = serde_json::from_value::<Vec<SkillTag>>(persisted_skills)
        .map_err(UserRepositoryError::persistence)?;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        name,
        email,
        role,
        status,
        skills,
        password: PasswordHash::from_digest(password_hash),
        last_login,
        created_at,
        updated_at,
    };
    Ok(UserAccount::from_persisted(data))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "users_email_unique")
}
