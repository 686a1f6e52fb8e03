//! Customer directory service.

use crate::customer::domain::{
    Customer, CustomerDomainError, CustomerId, CustomerName, PostalAddress,
};
use crate::customer::ports::{CustomerRepository, CustomerRepositoryError};
use crate::geo::{GeoError, GeoPoint};
use crate::identity::domain::{AuthenticatedPrincipal, Permission};
use crate::page::{Page, PageRequest};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a customer.
#[derive(Debug, Clone)]
pub struct RegisterCustomerRequest {
    name: String,
    street: String,
    city: String,
    state: String,
    postal_code: String,
}

impl RegisterCustomerRequest {
    /// Creates a request with required customer fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street: street.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Service-level errors for customer directory operations.
#[derive(Debug, Error)]
pub enum CustomerServiceError {
    /// The acting principal lacks the required permission.
    #[error("permission denied, requires {required}")]
    PermissionDenied {
        /// The permission the operation requires.
        required: Permission,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CustomerDomainError),

    /// Coordinate validation failed.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CustomerRepositoryError),
}

/// Result type for customer directory operations.
pub type CustomerServiceResult<T> = Result<T, CustomerServiceError>;

/// Customer record management orchestration.
#[derive(Clone)]
pub struct CustomerDirectoryService<R, C>
where
    R: CustomerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CustomerDirectoryService<R, C>
where
    R: CustomerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new customer directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new customer.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::PermissionDenied`] unless the actor
    /// may manage customers, or [`CustomerServiceError::Domain`] when
    /// validation fails.
    pub async fn register(
        &self,
        actor: &AuthenticatedPrincipal,
        request: RegisterCustomerRequest,
    ) -> CustomerServiceResult<Customer> {
        require(actor, Permission::ManageCustomers)?;

        let RegisterCustomerRequest {
            name,
            street,
            city,
            state,
            postal_code,
        } = request;

        let name = CustomerName::new(name)?;
        let address = PostalAddress::new(street, city, state, postal_code)?;

        let customer = Customer::register(name, address, &*self.clock);
        self.repository.store(&customer).await?;
        tracing::info!(customer = %customer.id(), "customer registered");
        Ok(customer)
    }

    /// Renames a customer.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::PermissionDenied`] unless the actor
    /// may manage customers.
    pub async fn rename(
        &self,
        actor: &AuthenticatedPrincipal,
        id: CustomerId,
        name: impl Into<String> + Send,
    ) -> CustomerServiceResult<Customer> {
        require(actor, Permission::ManageCustomers)?;

        let name = CustomerName::new(name)?;
        let mut customer = self.find_by_id_or_error(id).await?;
        customer.rename(name, &*self.clock);
        self.repository.update(&customer).await?;
        Ok(customer)
    }

    /// Replaces a customer's address, dropping stale coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::PermissionDenied`] unless the actor
    /// may manage customers, or [`CustomerServiceError::Domain`] when the
    /// address fails validation.
    pub async fn relocate(
        &self,
        actor: &AuthenticatedPrincipal,
        id: CustomerId,
        street: impl Into<String> + Send,
        city: impl Into<String> + Send,
        state: impl Into<String> + Send,
        postal_code: impl Into<String> + Send,
    ) -> CustomerServiceResult<Customer> {
        require(actor, Permission::ManageCustomers)?;

        let address = PostalAddress::new(street, city, state, postal_code)?;
        let mut customer = self.find_by_id_or_error(id).await?;
        customer.relocate(address, &*self.clock);
        self.repository.update(&customer).await?;
        Ok(customer)
    }

    /// Writes back a geocode result for a customer site.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::Geo`] for out-of-range coordinates
    /// and [`CustomerServiceError::PermissionDenied`] unless the actor may
    /// manage customers.
    pub async fn set_coordinates(
        &self,
        actor: &AuthenticatedPrincipal,
        id: CustomerId,
        latitude: f64,
        longitude: f64,
    ) -> CustomerServiceResult<Customer> {
        require(actor, Permission::ManageCustomers)?;

        let coordinates = GeoPoint::new(latitude, longitude)?;
        let mut customer = self.find_by_id_or_error(id).await?;
        customer.set_coordinates(coordinates, &*self.clock);
        self.repository.update(&customer).await?;
        Ok(customer)
    }

    /// Finds a customer by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn find(&self, id: CustomerId) -> CustomerServiceResult<Option<Customer>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists customers with stable pagination.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list(&self, page: PageRequest) -> CustomerServiceResult<Page<Customer>> {
        Ok(self.repository.list(page).await?)
    }

    /// Searches customers by case-insensitive name prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn search(&self, prefix: &str) -> CustomerServiceResult<Vec<Customer>> {
        Ok(self.repository.search_by_name_prefix(prefix).await?)
    }

    async fn find_by_id_or_error(&self, id: CustomerId) -> CustomerServiceResult<Customer> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerRepositoryError::NotFound(id).into())
    }
}

const fn require(
    actor: &AuthenticatedPrincipal,
    permission: Permission,
) -> Result<(), CustomerServiceError> {
    if actor.grants(permission) {
        Ok(())
    } else {
        Err(CustomerServiceError::PermissionDenied {
            required: permission,
        })
    }
}
