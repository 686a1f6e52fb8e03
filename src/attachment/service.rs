//! Job attachment service.

use crate::attachment::domain::{
    AttachmentDomainError, AttachmentId, AttachmentKind, FileName, JobAttachment,
};
use crate::attachment::store::{AttachmentStore, AttachmentStoreError};
use crate::identity::domain::{AuthenticatedPrincipal, Permission};
use crate::job::domain::JobId;
use crate::job::ports::{JobRepository, JobRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for attachment operations.
#[derive(Debug, Error)]
pub enum AttachmentServiceError {
    /// The acting principal lacks the required permission.
    #[error("permission denied, requires {required}")]
    PermissionDenied {
        /// The permission the operation requires.
        required: Permission,
    },

    /// The referenced job does not exist.
    #[error("unknown job: {0}")]
    UnknownJob(JobId),

    /// A technician uploaded to a job not assigned to them.
    #[error("job {0} is not assigned to the acting technician")]
    NotAssignedToActor(JobId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AttachmentDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] AttachmentStoreError),

    /// Job repository operation failed.
    #[error(transparent)]
    Jobs(#[from] JobRepositoryError),
}

/// Result type for attachment operations.
pub type AttachmentServiceResult<T> = Result<T, AttachmentServiceError>;

/// Upload and retrieval of job files and photos.
#[derive(Clone)]
pub struct JobAttachmentService<S, J, C>
where
    S: AttachmentStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    jobs: Arc<J>,
    clock: Arc<C>,
}

impl<S, J, C> JobAttachmentService<S, J, C>
where
    S: AttachmentStore,
    J: JobRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new attachment service.
    #[must_use]
    pub const fn new(store: Arc<S>, jobs: Arc<J>, clock: Arc<C>) -> Self {
        Self { store, jobs, clock }
    }

    /// Attaches content to a job.
    ///
    /// Job-managing roles may attach to any job; technicians only to jobs
    /// assigned to them.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::UnknownJob`] for dangling job
    /// references, [`AttachmentServiceError::NotAssignedToActor`] for
    /// technicians uploading to someone else's job, and
    /// [`AttachmentServiceError::Domain`] when the file name or size fail
    /// validation.
    pub async fn attach(
        &self,
        actor: &AuthenticatedPrincipal,
        job_id: JobId,
        kind: AttachmentKind,
        file_name: impl Into<String> + Send,
        content_type: Option<String>,
        content: Vec<u8>,
    ) -> AttachmentServiceResult<JobAttachment> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or(AttachmentServiceError::UnknownJob(job_id))?;

        if !actor.grants(Permission::ManageJobs) {
            if !actor.grants(Permission::RecordJobProgress) {
                return Err(AttachmentServiceError::PermissionDenied {
                    required: Permission::RecordJobProgress,
                });
            }
            if job.technician() != Some(actor.user_id()) {
                return Err(AttachmentServiceError::NotAssignedToActor(job_id));
            }
        }

        let file_name = FileName::new(file_name)?;
        let attachment = JobAttachment::new(
            job_id,
            kind,
            file_name,
            content_type,
            content.len() as u64,
            actor.user_id(),
            &*self.clock,
        )?;

        self.store.save(&attachment, content).await?;
        tracing::info!(
            attachment = %attachment.id(),
            job = %job_id,
            bytes = attachment.size_bytes(),
            "attachment stored"
        );
        Ok(attachment)
    }

    /// Returns a job's attachments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::Store`] when the store fails.
    pub async fn list(&self, job_id: JobId) -> AttachmentServiceResult<Vec<JobAttachment>> {
        Ok(self.store.list_for_job(job_id).await?)
    }

    /// Returns an attachment's metadata and content.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentServiceError::Store`] when the store fails.
    pub async fn open(
        &self,
        id: AttachmentId,
    ) -> AttachmentServiceResult<Option<(JobAttachment, Vec<u8>)>> {
        let Some(metadata) = self.store.find(id).await? else {
            return Ok(None);
        };
        let Some(content) = self.store.open(id).await? else {
            return Ok(None);
        };
        Ok(Some((metadata, content)))
    }
}
