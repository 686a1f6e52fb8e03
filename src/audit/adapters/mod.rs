//! Adapter implementations for the audit context.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryActionLog;
pub use postgres::{ActionLogPgPool, PostgresActionLog};
