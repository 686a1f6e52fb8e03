//! Domain types for job file and photo attachments.

use crate::identity::domain::UserId;
use crate::job::domain::JobId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Upload size ceiling: 10 MiB, matching the original upload limit.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Maximum length for a stored file name.
const MAX_FILE_NAME_LENGTH: usize = 255;

/// Errors returned while constructing attachment domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentDomainError {
    /// The file name is empty after trimming.
    #[error("file name must not be empty")]
    EmptyFileName,

    /// The file name contains path separators or traversal segments.
    #[error("invalid file name '{0}'")]
    InvalidFileName(String),

    /// The file name exceeds the storage limit.
    #[error("file name '{0}' exceeds 255 characters")]
    FileNameTooLong(String),

    /// The upload is empty.
    #[error("attachment content must not be empty")]
    EmptyContent,

    /// The upload exceeds the size ceiling.
    #[error("attachment of {0} bytes exceeds the {MAX_ATTACHMENT_BYTES} byte limit")]
    ContentTooLarge(u64),
}

/// Error returned while parsing attachment kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attachment kind: {0}")]
pub struct ParseAttachmentKindError(pub String);

/// Unique identifier for an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(Uuid);

impl AttachmentId {
    /// Creates a new random attachment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an attachment identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an attachment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// A site or equipment photo.
    Photo,
    /// Any other document.
    Document,
}

impl AttachmentKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AttachmentKind {
    type Error = ParseAttachmentKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "photo" => Ok(Self::Photo),
            "document" => Ok(Self::Document),
            _ => Err(ParseAttachmentKindError(value.to_owned())),
        }
    }
}

/// Validated upload file name: a single path component, no traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileName(String);

impl FileName {
    /// Creates a validated file name.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentDomainError::EmptyFileName`],
    /// [`AttachmentDomainError::FileNameTooLong`], or
    /// [`AttachmentDomainError::InvalidFileName`] for path separators,
    /// traversal segments, and control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AttachmentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AttachmentDomainError::EmptyFileName);
        }
        if trimmed.chars().count() > MAX_FILE_NAME_LENGTH {
            return Err(AttachmentDomainError::FileNameTooLong(raw));
        }

        let has_separator = trimmed.contains('/') || trimmed.contains('\\');
        let is_traversal = trimmed == "." || trimmed == "..";
        let has_control = trimmed.chars().any(char::is_control);
        if has_separator || is_traversal || has_control {
            return Err(AttachmentDomainError::InvalidFileName(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the file name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata of one stored attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAttachment {
    id: AttachmentId,
    job_id: JobId,
    kind: AttachmentKind,
    file_name: FileName,
    content_type: Option<String>,
    size_bytes: u64,
    uploaded_by: UserId,
    uploaded_at: DateTime<Utc>,
}

impl JobAttachment {
    /// Creates attachment metadata for validated content.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentDomainError::EmptyContent`] for zero bytes and
    /// [`AttachmentDomainError::ContentTooLarge`] beyond the ceiling.
    pub fn new(
        job_id: JobId,
        kind: AttachmentKind,
        file_name: FileName,
        content_type: Option<String>,
        size_bytes: u64,
        uploaded_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, AttachmentDomainError> {
        if size_bytes == 0 {
            return Err(AttachmentDomainError::EmptyContent);
        }
        if size_bytes > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentDomainError::ContentTooLarge(size_bytes));
        }

        Ok(Self {
            id: AttachmentId::new(),
            job_id,
            kind,
            file_name,
            content_type,
            size_bytes,
            uploaded_by,
            uploaded_at: clock.utc(),
        })
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the job this attachment belongs to.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns what the attachment holds.
    #[must_use]
    pub const fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// Returns the upload file name.
    #[must_use]
    pub const fn file_name(&self) -> &FileName {
        &self.file_name
    }

    /// Returns the declared content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Returns the uploading user.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}
