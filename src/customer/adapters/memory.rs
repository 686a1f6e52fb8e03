//! In-memory customer repository for tests and headless composition.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::customer::domain::{Customer, CustomerId};
use crate::customer::ports::{
    CustomerRepository, CustomerRepositoryError, CustomerRepositoryResult,
};
use crate::page::{Page, PageRequest};

/// Thread-safe in-memory customer repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    state: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> CustomerRepositoryError {
    CustomerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn store(&self, customer: &Customer) -> CustomerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.contains_key(&customer.id()) {
            return Err(CustomerRepositoryError::DuplicateCustomer(customer.id()));
        }
        state.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> CustomerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.contains_key(&customer.id()) {
            return Err(CustomerRepositoryError::NotFound(customer.id()));
        }
        state.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> CustomerRepositoryResult<Option<Customer>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> CustomerRepositoryResult<Page<Customer>> {
        let state = self.state.read().map_err(poisoned)?;

        let mut customers: Vec<Customer> = state.values().cloned().collect();
        customers.sort_by_key(|customer| (customer.created_at(), customer.id().into_inner()));

        let total = customers.len() as u64;
        let items = customers
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size() as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn search_by_name_prefix(
        &self,
        prefix: &str,
    ) -> CustomerRepositoryResult<Vec<Customer>> {
        let state = self.state.read().map_err(poisoned)?;
        let needle = prefix.trim().to_lowercase();

        let mut matches: Vec<Customer> = state
            .values()
            .filter(|customer| {
                customer
                    .name()
                    .as_str()
                    .to_lowercase()
                    .starts_with(&needle)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(matches)
    }
}
