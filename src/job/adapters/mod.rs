//! Adapter implementations for the job context.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryJobRepository;
pub use postgres::{JobPgPool, PostgresJobRepository};
