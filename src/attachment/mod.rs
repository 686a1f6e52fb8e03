//! Job file and photo attachments for Fieldline.
//!
//! Uploads are validated (single-component file name, 10 MiB ceiling)
//! before any byte is written, then stored write-once behind the
//! [`store::AttachmentStore`] port: a capability-scoped filesystem adapter
//! for deployments and an in-memory adapter for tests.

pub mod domain;
pub mod fs;
pub mod memory;
pub mod service;
pub mod store;

pub use fs::FsAttachmentStore;
pub use memory::InMemoryAttachmentStore;
pub use service::{AttachmentServiceError, AttachmentServiceResult, JobAttachmentService};
pub use store::{AttachmentStore, AttachmentStoreError, AttachmentStoreResult};
