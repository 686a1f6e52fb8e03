//! Adapter implementations for the customer context.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCustomerRepository;
pub use postgres::{CustomerPgPool, PostgresCustomerRepository};
