//! Capability-scoped filesystem attachment store.
//!
//! Files live inside a single pre-opened directory capability; nothing in
//! this module can write outside it. Layout per attachment: `<id>.bin`
//! holds the content, `<id>.json` its metadata, and `job-<job id>.json`
//! keeps the per-job metadata manifest so job listings need no directory
//! scans.

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::attachment::domain::{AttachmentId, JobAttachment};
use crate::attachment::store::{AttachmentStore, AttachmentStoreError, AttachmentStoreResult};
use crate::job::domain::JobId;

/// Filesystem-backed attachment store rooted in a directory capability.
#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: Arc<Dir>,
}

impl FsAttachmentStore {
    /// Creates a store over an opened directory capability.
    #[must_use]
    pub fn new(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AttachmentStoreResult<T>
    where
        F: FnOnce(&Dir) -> AttachmentStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || f(&root))
            .await
            .map_err(AttachmentStoreError::persistence)?
    }
}

fn content_path(id: AttachmentId) -> String {
    format!("{id}.bin")
}

fn metadata_path(id: AttachmentId) -> String {
    format!("{id}.json")
}

fn manifest_path(job_id: JobId) -> String {
    format!("job-{job_id}.json")
}

fn read_optional(root: &Dir, path: &str) -> AttachmentStoreResult<Option<Vec<u8>>> {
    match root.read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AttachmentStoreError::persistence(err)),
    }
}

fn read_manifest(root: &Dir, job_id: JobId) -> AttachmentStoreResult<Vec<JobAttachment>> {
    let Some(bytes) = read_optional(root, &manifest_path(job_id))? else {
        return Ok(Vec::new());
    };
    serde_json::from_slice(&bytes).map_err(AttachmentStoreError::persistence)
}

fn write_json<T: serde::Serialize>(
    root: &Dir,
    path: &str,
    value: &T,
) -> AttachmentStoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(AttachmentStoreError::persistence)?;
    root.write(path, bytes)
        .map_err(AttachmentStoreError::persistence)
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn save(
        &self,
        attachment: &JobAttachment,
        content: Vec<u8>,
    ) -> AttachmentStoreResult<()> {
        let attachment = attachment.clone();
        self.run_blocking(move |root| {
            let meta_path = metadata_path(attachment.id());
            if read_optional(root, &meta_path)?.is_some() {
                return Err(AttachmentStoreError::DuplicateAttachment(attachment.id()));
            }

            root.write(content_path(attachment.id()), &content)
                .map_err(AttachmentStoreError::persistence)?;
            write_json(root, &meta_path, &attachment)?;

            let mut manifest = read_manifest(root, attachment.job_id())?;
            manifest.push(attachment.clone());
            write_json(root, &manifest_path(attachment.job_id()), &manifest)?;
            Ok(())
        })
        .await
    }

    async fn find(&self, id: AttachmentId) -> AttachmentStoreResult<Option<JobAttachment>> {
        self.run_blocking(move |root| {
            let Some(bytes) = read_optional(root, &metadata_path(id))? else {
                return Ok(None);
            };
            serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(AttachmentStoreError::persistence)
        })
        .await
    }

    async fn open(&self, id: AttachmentId) -> AttachmentStoreResult<Option<Vec<u8>>> {
        self.run_blocking(move |root| read_optional(root, &content_path(id)))
            .await
    }

    async fn list_for_job(&self, job_id: JobId) -> AttachmentStoreResult<Vec<JobAttachment>> {
        self.run_blocking(move |root| read_manifest(root, job_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::FsAttachmentStore;
    use crate::attachment::domain::{AttachmentKind, FileName, JobAttachment};
    use crate::attachment::store::{AttachmentStore, AttachmentStoreError};
    use crate::identity::domain::UserId;
    use crate::job::domain::JobId;
    use cap_std::ambient_authority;
    use cap_std::fs_utf8::Dir;
    use eyre::ensure;
    use mockable::DefaultClock;

    fn store() -> eyre::Result<(FsAttachmentStore, tempdir::Guard)> {
        let guard = tempdir::create()?;
        let dir = Dir::open_ambient_dir(guard.path.as_str(), ambient_authority())?;
        Ok((FsAttachmentStore::new(dir), guard))
    }

    // Minimal scoped temporary directory; removed on drop.
    mod tempdir {
        pub struct Guard {
            pub path: String,
        }

        impl Drop for Guard {
            fn drop(&mut self) {
                let _ = std::fs::remove_dir_all(&self.path);
            }
        }

        pub fn create() -> std::io::Result<Guard> {
            let base = std::env::temp_dir()
                .join(format!("fieldline-attachments-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&base)?;
            let path = base.to_string_lossy().into_owned();
            Ok(Guard { path })
        }
    }

    fn attachment(job_id: JobId, name: &str, bytes: u64) -> eyre::Result<JobAttachment> {
        let file_name = FileName::new(name).map_err(|err| eyre::eyre!(err))?;
        JobAttachment::new(
            job_id,
            AttachmentKind::Photo,
            file_name,
            Some("image/jpeg".to_owned()),
            bytes,
            UserId::new(),
            &DefaultClock,
        )
        .map_err(|err| eyre::eyre!(err))
    }

    #[tokio::test]
    async fn save_and_read_round_trips() -> eyre::Result<()> {
        let (store, _guard) = store()?;
        let job_id = JobId::new();
        let meta = attachment(job_id, "site.jpg", 4)?;

        store.save(&meta, vec![1, 2, 3, 4]).await?;

        let found = store.find(meta.id()).await?;
        ensure!(found.as_ref() == Some(&meta));

        let content = store.open(meta.id()).await?;
        ensure!(content.as_deref() == Some(&[1, 2, 3, 4][..]));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_save_is_rejected() -> eyre::Result<()> {
        let (store, _guard) = store()?;
        let meta = attachment(JobId::new(), "twice.jpg", 2)?;

        store.save(&meta, vec![7, 7]).await?;
        match store.save(&meta, vec![7, 7]).await {
            Err(AttachmentStoreError::DuplicateAttachment(id)) if id == meta.id() => Ok(()),
            other => eyre::bail!("expected DuplicateAttachment, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn job_manifest_lists_only_its_attachments() -> eyre::Result<()> {
        let (store, _guard) = store()?;
        let job_a = JobId::new();
        let job_b = JobId::new();

        let first = attachment(job_a, "before.jpg", 3)?;
        let second = attachment(job_a, "after.jpg", 3)?;
        let other = attachment(job_b, "unrelated.jpg", 3)?;

        store.save(&first, vec![1, 1, 1]).await?;
        store.save(&second, vec![2, 2, 2]).await?;
        store.save(&other, vec![3, 3, 3]).await?;

        let listing = store.list_for_job(job_a).await?;
        ensure!(listing.len() == 2);
        ensure!(listing.iter().all(|item| item.job_id() == job_a));
        Ok(())
    }

    #[tokio::test]
    async fn missing_attachment_reads_as_none() -> eyre::Result<()> {
        let (store, _guard) = store()?;
        let id = crate::attachment::domain::AttachmentId::new();
        ensure!(store.find(id).await?.is_none());
        ensure!(store.open(id).await?.is_none());
        Ok(())
    }
}
