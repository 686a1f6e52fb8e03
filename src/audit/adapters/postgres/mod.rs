//! `PostgreSQL` adapter for the audit context.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{ActionLogPgPool, PostgresActionLog};
