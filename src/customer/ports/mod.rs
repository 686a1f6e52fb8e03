//! Port contracts for the customer context.

mod repository;

pub use repository::{CustomerRepository, CustomerRepositoryError, CustomerRepositoryResult};
