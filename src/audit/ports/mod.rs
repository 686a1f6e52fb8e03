//! Port contracts for the audit context.

mod repository;

pub use repository::{
    ActionLogQuery, ActionLogRepository, ActionLogRepositoryError, ActionLogRepositoryResult,
};
