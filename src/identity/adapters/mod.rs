//! Adapter implementations for the identity context.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::{PostgresUserRepository, UserPgPool};
