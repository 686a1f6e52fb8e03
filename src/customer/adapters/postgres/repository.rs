//! `PostgreSQL` repository implementation for customer storage.

use super::{
    models::{CustomerRow, NewCustomerRow},
    schema::customers,
};
use crate::customer::domain::{
    Customer, CustomerId, CustomerName, PersistedCustomerData, PostalAddress,
};
use crate::customer::ports::{
    CustomerRepository, CustomerRepositoryError, CustomerRepositoryResult,
};
use crate::geo::GeoPoint;
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by customer adapters.
pub type CustomerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed customer repository.
#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: CustomerPgPool,
}

impl PostgresCustomerRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CustomerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CustomerRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CustomerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CustomerRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CustomerRepositoryError::persistence)?
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn store(&self, customer: &Customer) -> CustomerRepositoryResult<()> {
        let customer_id = customer.id();
        let new_row = to_new_row(customer);

        self.run_blocking(move |connection| {
            diesel::insert_into(customers::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CustomerRepositoryError::DuplicateCustomer(customer_id)
                    }
                    _ => CustomerRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, customer: &Customer) -> CustomerRepositoryResult<()> {
        let customer_id = customer.id();
        let row = to_new_row(customer);

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                customers::table.filter(customers::id.eq(customer_id.into_inner())),
            )
            .set((
                customers::name.eq(&row.name),
                customers::street.eq(&row.street),
                customers::city.eq(&row.city),
                customers::state.eq(&row.state),
                customers::postal_code.eq(&row.postal_code),
                customers::latitude.eq(row.latitude),
                customers::longitude.eq(row.longitude),
                customers::updated_at.eq(row.updated_at),
            ))
            .execute(connection)
            .map_err(CustomerRepositoryError::persistence)?;

            if affected == 0 {
                return Err(CustomerRepositoryError::NotFound(customer_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: CustomerId) -> CustomerRepositoryResult<Option<Customer>> {
        self.run_blocking(move |connection| {
            let row = customers::table
                .filter(customers::id.eq(id.into_inner()))
                .select(CustomerRow::as_select())
                .first::<CustomerRow>(connection)
                .optional()
                .map_err(CustomerRepositoryError::persistence)?;
            row.map(row_to_customer).transpose()
        })
        .await
    }

    async fn list(&self, page: PageRequest) -> CustomerRepositoryResult<Page<Customer>> {
        self.run_blocking(move |connection| {
            let total: i64 = customers::table
                .count()
                .get_result(connection)
                .map_err(CustomerRepositoryError::persistence)?;

            let rows = customers::table
                .order((customers::created_at.asc(), customers::id.asc()))
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .limit(i64::from(page.size()))
                .select(CustomerRow::as_select())
                .load::<CustomerRow>(connection)
                .map_err(CustomerRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_customer)
                .collect::<CustomerRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, total.unsigned_abs(), page))
        })
        .await
    }

    async fn search_by_name_prefix(
        &self,
        prefix: &str,
    ) -> CustomerRepositoryResult<Vec<Customer>> {
        let pattern = format!("{}%", escape_like(prefix.trim()));
        self.run_blocking(move |connection| {
            let rows = customers::table
                .filter(customers::name.ilike(&pattern))
                .order(customers::name.asc())
                .select(CustomerRow::as_select())
                .load::<CustomerRow>(connection)
                .map_err(CustomerRepositoryError::persistence)?;

            rows.into_iter().map(row_to_customer).collect()
        })
        .await
    }
}

/// Escapes `LIKE` wildcards so a prefix search cannot be widened by input.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn to_new_row(customer: &Customer) -> NewCustomerRow {
    NewCustomerRow {
        id: customer.id().into_inner(),
        name: customer.name().as_str().to_owned(),
        street: customer.address().street().to_owned(),
        city: customer.address().city().to_owned(),
        state: customer.address().state().to_owned(),
        postal_code: customer.address().postal_code().to_owned(),
        latitude: customer.coordinates().map(GeoPoint::latitude),
        longitude: customer.coordinates().map(GeoPoint::longitude),
        created_at: customer.created_at(),
        updated_at: customer.updated_at(),
    }
}

fn row_to_customer(row: CustomerRow) -> CustomerRepositoryResult<Customer> {
    let CustomerRow {
        id,
        name,
        street,
        city,
        state,
        postal_code,
        latitude,
        longitude,
        created_at,
        updated_at,
    } = row;

    let name = CustomerName::new(name).map_err(CustomerRepositoryError::persistence)?;
    let address = PostalAddress::new(street, city, state, postal_code)
        .map_err(CustomerRepositoryError::persistence)?;
    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lng)) => {
            Some(GeoPoint::new(lat, lng).map_err(CustomerRepositoryError::persistence)?)
        }
        _ => None,
    };

    let data = PersistedCustomerData {
        id: CustomerId::from_uuid(id),
        name,
        address,
        coordinates,
        created_at,
        updated_at,
    };
    Ok(Customer::from_persisted(data))
}
