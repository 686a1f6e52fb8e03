//! Orchestration services for the audit context.

mod trail;

pub use trail::{AuditTrailError, AuditTrailResult, AuditTrailService};
