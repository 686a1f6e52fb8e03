//! Domain types for the append-only action log.

mod entry;
mod error;

pub use entry::{
    ActionLogEntry, ActionLogId, ActionName, PersistedActionLogData, RequestOrigin, ResourceKind,
};
pub use error::{AuditDomainError, ParseResourceKindError};
