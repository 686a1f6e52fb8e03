//! In-memory attachment store for tests and headless composition.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::attachment::domain::{AttachmentId, JobAttachment};
use crate::attachment::store::{AttachmentStore, AttachmentStoreError, AttachmentStoreResult};
use crate::job::domain::JobId;

/// Thread-safe in-memory attachment store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentStore {
    state: Arc<RwLock<HashMap<AttachmentId, (JobAttachment, Vec<u8>)>>>,
}

impl InMemoryAttachmentStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> AttachmentStoreError {
    AttachmentStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn save(
        &self,
        attachment: &JobAttachment,
        content: Vec<u8>,
    ) -> AttachmentStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.contains_key(&attachment.id()) {
            return Err(AttachmentStoreError::DuplicateAttachment(attachment.id()));
        }
        state.insert(attachment.id(), (attachment.clone(), content));
        Ok(())
    }

    async fn find(&self, id: AttachmentId) -> AttachmentStoreResult<Option<JobAttachment>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&id).map(|(attachment, _)| attachment.clone()))
    }

    async fn open(&self, id: AttachmentId) -> AttachmentStoreResult<Option<Vec<u8>>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&id).map(|(_, content)| content.clone()))
    }

    async fn list_for_job(&self, job_id: JobId) -> AttachmentStoreResult<Vec<JobAttachment>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut attachments: Vec<JobAttachment> = state
            .values()
            .filter(|(attachment, _)| attachment.job_id() == job_id)
            .map(|(attachment, _)| attachment.clone())
            .collect();
        attachments.sort_by_key(|attachment| (attachment.uploaded_at(), attachment.id().into_inner()));
        Ok(attachments)
    }
}
