//! `PostgreSQL` adapter for the customer context.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{CustomerPgPool, PostgresCustomerRepository};
