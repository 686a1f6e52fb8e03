//! `PostgreSQL` adapter for the job context.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{JobPgPool, PostgresJobRepository};
