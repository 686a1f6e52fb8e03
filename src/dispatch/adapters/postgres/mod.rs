//! `PostgreSQL` adapter for the dispatch context.

pub mod models;
pub mod repository;
pub mod schema;

pub use repository::{PostgresRoutePlanRepository, RoutePlanPgPool};
