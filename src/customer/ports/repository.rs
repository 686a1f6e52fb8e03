//! Repository port for customer persistence and lookup.

use crate::customer::domain::{Customer, CustomerId};
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for customer repository operations.
pub type CustomerRepositoryResult<T> = Result<T, CustomerRepositoryError>;

/// Customer persistence contract.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Stores a new customer.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerRepositoryError::DuplicateCustomer`] when the
    /// identifier already exists.
    async fn store(&self, customer: &Customer) -> CustomerRepositoryResult<()>;

    /// Persists changes to an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerRepositoryError::NotFound`] when the customer does
    /// not exist.
    async fn update(&self, customer: &Customer) -> CustomerRepositoryResult<()>;

    /// Finds a customer by identifier.
    ///
    /// Returns `None` when the customer does not exist.
    async fn find_by_id(&self, id: CustomerId) -> CustomerRepositoryResult<Option<Customer>>;

    /// Lists customers ordered by `(created_at, id)` for stable pagination.
    async fn list(&self, page: PageRequest) -> CustomerRepositoryResult<Page<Customer>>;

    /// Returns customers whose name starts with the given prefix,
    /// case-insensitively, ordered by name.
    async fn search_by_name_prefix(&self, prefix: &str)
    -> CustomerRepositoryResult<Vec<Customer>>;
}

/// Errors returned by customer repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CustomerRepositoryError {
    /// A customer with the same identifier already exists.
    #[error("duplicate customer identifier: {0}")]
    DuplicateCustomer(CustomerId),

    /// The customer was not found.
    #[error("customer not found: {0}")]
    NotFound(CustomerId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CustomerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
