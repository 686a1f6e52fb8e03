//! Port for attachment content and metadata storage.

use crate::attachment::domain::{AttachmentId, JobAttachment};
use crate::job::domain::JobId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for attachment store operations.
pub type AttachmentStoreResult<T> = Result<T, AttachmentStoreError>;

/// Attachment persistence contract. Content is write-once: no overwrite
/// or delete path exists.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Stores metadata and content for a new attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentStoreError::DuplicateAttachment`] when the
    /// identifier is already stored.
    async fn save(
        &self,
        attachment: &JobAttachment,
        content: Vec<u8>,
    ) -> AttachmentStoreResult<()>;

    /// Finds attachment metadata by identifier.
    ///
    /// Returns `None` when the attachment does not exist.
    async fn find(&self, id: AttachmentId) -> AttachmentStoreResult<Option<JobAttachment>>;

    /// Reads attachment content by identifier.
    ///
    /// Returns `None` when the attachment does not exist.
    async fn open(&self, id: AttachmentId) -> AttachmentStoreResult<Option<Vec<u8>>>;

    /// Returns all attachments of a job, oldest first.
    async fn list_for_job(&self, job_id: JobId) -> AttachmentStoreResult<Vec<JobAttachment>>;
}

/// Errors returned by attachment store implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentStoreError {
    /// An attachment with the same identifier already exists.
    #[error("duplicate attachment identifier: {0}")]
    DuplicateAttachment(AttachmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
