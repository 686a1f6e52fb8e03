//! Adapter implementations for the dispatch context.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRoutePlanRepository;
pub use postgres::{PostgresRoutePlanRepository, RoutePlanPgPool};
