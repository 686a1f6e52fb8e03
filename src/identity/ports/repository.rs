//! Repository port for user account persistence and lookup.

use crate::identity::domain::{EmailAddress, UserAccount, UserId};
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User account persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUser`] when the account ID
    /// already exists or [`UserRepositoryError::DuplicateEmail`] when the
    /// email is already registered.
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()>;

    /// Persists changes to an existing account.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the account does not
    /// exist.
    async fn update(&self, account: &UserAccount) -> UserRepositoryResult<()>;

    /// Finds an account by identifier.
    ///
    /// Returns `None` when the account does not exist.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>>;

    /// Finds an account by normalized email address.
    ///
    /// Returns `None` when no account has the address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>>;

    /// Lists accounts ordered by `(created_at, id)` for stable pagination.
    async fn list(&self, page: PageRequest) -> UserRepositoryResult<Page<UserAccount>>;

    /// Returns all active accounts with the technician role.
    async fn list_active_technicians(&self) -> UserRepositoryResult<Vec<UserAccount>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// An account with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// An account with the same email already exists.
    #[error("duplicate email address: {0}")]
    DuplicateEmail(EmailAddress),

    /// The account was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
