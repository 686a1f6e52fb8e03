//! `PostgreSQL` adapter for the identity context.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{PostgresUserRepository, UserPgPool};
