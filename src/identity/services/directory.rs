//! Admin-gated user directory service.

use crate::identity::domain::{
    AuthenticatedPrincipal, DisplayName, EmailAddress, IdentityDomainError, PasswordHash,
    Permission, SkillTag, UserAccount, UserId, UserRole,
};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::page::{Page, PageRequest};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a user account.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    name: String,
    email: String,
    role: UserRole,
    password: String,
    skills: Vec<String>,
}

impl CreateUserRequest {
    /// Creates a request with required account fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
            password: password.into(),
            skills: Vec::new(),
        }
    }

    /// Sets initial skill tags.
    #[must_use]
    pub fn with_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }
}

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum DirectoryServiceError {
    /// The acting principal lacks the required permission.
    #[error("permission denied, requires {required}")]
    PermissionDenied {
        /// The permission the operation requires.
        required: Permission,
    },

    /// A user attempted to deactivate their own account.
    #[error("cannot deactivate own account")]
    CannotDeactivateSelf,

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for user directory operations.
pub type DirectoryServiceResult<T> = Result<T, DirectoryServiceError>;

/// User account management orchestration.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] unless the actor
    /// may manage users, [`DirectoryServiceError::Domain`] when validation
    /// fails, and [`DirectoryServiceError::Repository`] on email conflicts.
    pub async fn create_user(
        &self,
        actor: &AuthenticatedPrincipal,
        request: CreateUserRequest,
    ) -> DirectoryServiceResult<UserAccount> {
        require(actor, Permission::ManageUsers)?;

        let CreateUserRequest {
            name,
            email,
            role,
            password,
            skills,
        } = request;

        let name = DisplayName::new(name)?;
        let email = EmailAddress::new(email)?;
        let skills = skills
            .into_iter()
            .map(SkillTag::new)
            .collect::<Result<Vec<_>, _>>()?;
        let password = hash_blocking(password).await?;

        let mut account = UserAccount::register(name, email, role, password, &*self.clock);
        if !skills.is_empty() {
            account.set_skills(skills, &*self.clock);
        }

        self.repository.store(&account).await?;
        tracing::info!(user = %account.id(), role = %account.role(), "user created");
        Ok(account)
    }

    /// Lists accounts with stable pagination.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] unless the actor
    /// may manage users.
    pub async fn list_users(
        &self,
        actor: &AuthenticatedPrincipal,
        page: PageRequest,
    ) -> DirectoryServiceResult<Page<UserAccount>> {
        require(actor, Permission::ManageUsers)?;
        Ok(self.repository.list(page).await?)
    }

    /// Finds an account by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] unless the actor
    /// may manage users.
    pub async fn find_user(
        &self,
        actor: &AuthenticatedPrincipal,
        id: UserId,
    ) -> DirectoryServiceResult<Option<UserAccount>> {
        require(actor, Permission::ManageUsers)?;
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Changes an account's role.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] unless the actor
    /// may manage users, or a repository error when the account is missing.
    pub async fn change_role(
        &self,
        actor: &AuthenticatedPrincipal,
        id: UserId,
        role: UserRole,
    ) -> DirectoryServiceResult<UserAccount> {
        require(actor, Permission::ManageUsers)?;

        let mut account = self.find_by_id_or_error(id).await?;
        account.change_role(role, &*self.clock);
        self.repository.update(&account).await?;
        Ok(account)
    }

    /// Replaces an account's skill tags.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] unless the actor
    /// may manage users, or [`DirectoryServiceError::Domain`] for invalid
    /// tags.
    pub async fn set_skills(
        &self,
        actor: &AuthenticatedPrincipal,
        id: UserId,
        skills: impl IntoIterator<Item = String> + Send,
    ) -> DirectoryServiceResult<UserAccount> {
        require(actor, Permission::ManageUsers)?;

        let skills = skills
            .into_iter()
            .map(SkillTag::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut account = self.find_by_id_or_error(id).await?;
        account.set_skills(skills, &*self.clock);
        self.repository.update(&account).await?;
        Ok(account)
    }

    /// Deactivates an account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::CannotDeactivateSelf`] when the
    /// actor targets their own account, and
    /// [`DirectoryServiceError::PermissionDenied`] unless the actor may
    /// manage users.
    pub async fn deactivate(
        &self,
        actor: &AuthenticatedPrincipal,
        id: UserId,
    ) -> DirectoryServiceResult<UserAccount> {
        require(actor, Permission::ManageUsers)?;
        if actor.user_id() == id {
            return Err(DirectoryServiceError::CannotDeactivateSelf);
        }

        let mut account = self.find_by_id_or_error(id).await?;
        account.deactivate(&*self.clock);
        self.repository.update(&account).await?;
        tracing::info!(user = %id, "user deactivated");
        Ok(account)
    }

    /// Reactivates an account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] unless the actor
    /// may manage users.
    pub async fn reactivate(
        &self,
        actor: &AuthenticatedPrincipal,
        id: UserId,
    ) -> DirectoryServiceResult<UserAccount> {
        require(actor, Permission::ManageUsers)?;

        let mut account = self.find_by_id_or_error(id).await?;
        account.activate(&*self.clock);
        self.repository.update(&account).await?;
        Ok(account)
    }

    /// Returns all active technician accounts; the dispatch collector's
    /// technician source.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_active_technicians(&self) -> DirectoryServiceResult<Vec<UserAccount>> {
        Ok(self.repository.list_active_technicians().await?)
    }

    async fn find_by_id_or_error(&self, id: UserId) -> DirectoryServiceResult<UserAccount> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserRepositoryError::NotFound(id).into())
    }
}

const fn require(
    actor: &AuthenticatedPrincipal,
    permission: Permission,
) -> Result<(), DirectoryServiceError> {
    if actor.grants(permission) {
        Ok(())
    } else {
        Err(DirectoryServiceError::PermissionDenied {
            required: permission,
        })
    }
}

/// Runs bcrypt hashing on the blocking pool.
async fn hash_blocking(plaintext: String) -> Result<PasswordHash, IdentityDomainError> {
    tokio::task::spawn_blocking(move || PasswordHash::from_plaintext(&plaintext))
        .await
        .map_err(|err| IdentityDomainError::Hashing(err.to_string()))?
}
