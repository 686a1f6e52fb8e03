//! Authentication service: login, token refresh, and password changes.

use crate::identity::domain::{
    EmailAddress, IdentityDomainError, PasswordHash, UserAccount, UserId,
};
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::identity::services::token::{TokenError, TokenPair, TokenService};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// A bcrypt digest verified against when the email is unknown, so that
/// lookups for existing and non-existing accounts take comparable time.
/// The corresponding plaintext is not a valid password in this system.
const DUMMY_DIGEST: &str = "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// Errors returned by authentication operations.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The email/password combination is not valid.
    ///
    /// Deliberately identical for unknown emails and wrong passwords so the
    /// response never reveals whether an email is registered.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The credentials are valid but the account is deactivated.
    #[error("account is deactivated")]
    AccountInactive,

    /// The current password supplied to a password change is wrong.
    #[error("current password does not match")]
    CurrentPasswordMismatch,

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// Token issuing or verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for authentication operations.
pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

/// An authenticated account together with its freshly issued tokens.
#[derive(Debug, Clone)]
pub struct AuthSession {
    account: UserAccount,
    tokens: TokenPair,
}

impl AuthSession {
    /// Returns the authenticated account.
    #[must_use]
    pub const fn account(&self) -> &UserAccount {
        &self.account
    }

    /// Returns the issued token pair.
    #[must_use]
    pub const fn tokens(&self) -> &TokenPair {
        &self.tokens
    }
}

/// Login, refresh, and password-change orchestration.
#[derive(Clone)]
pub struct AuthService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    tokens: Arc<TokenService>,
    clock: Arc<C>,
}

impl<R, C> AuthService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new authentication service.
    #[must_use]
    pub const fn new(repository: Arc<R>, tokens: Arc<TokenService>, clock: Arc<C>) -> Self {
        Self {
            repository,
            tokens,
            clock,
        }
    }

    /// Authenticates an email/password pair and issues tokens.
    ///
    /// Stamps `last_login` on success.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidCredentials`] for unknown emails
    /// and wrong passwords alike, and [`AuthServiceError::AccountInactive`]
    /// when the password is correct but the account is deactivated.
    pub async fn login(&self, email: &str, password: &str) -> AuthServiceResult<AuthSession> {
        let Ok(email) = EmailAddress::new(email) else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        let account = self.repository.find_by_email(&email).await?;

        let digest = account.as_ref().map_or_else(
            || PasswordHash::from_digest(DUMMY_DIGEST),
            |found| found.password().clone(),
        );
        let verified = verify_blocking(digest, password.to_owned()).await?;

        let Some(mut account) = account else {
            return Err(AuthServiceError::InvalidCredentials);
        };
        if !verified {
            return Err(AuthServiceError::InvalidCredentials);
        }
        if !account.is_active() {
            return Err(AuthServiceError::AccountInactive);
        }

        account.record_login(&*self.clock);
        self.repository.update(&account).await?;

        let tokens = self.tokens.issue_pair(&account, &*self.clock)?;
        tracing::info!(user = %account.id(), "login succeeded");
        Ok(AuthSession { account, tokens })
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Token`] for invalid or expired refresh
    /// tokens, [`AuthServiceError::InvalidCredentials`] when the account no
    /// longer exists, and [`AuthServiceError::AccountInactive`] when it has
    /// been deactivated since the token was issued.
    pub async fn refresh(&self, refresh_token: &str) -> AuthServiceResult<AuthSession> {
        let principal = self.tokens.verify_refresh(refresh_token)?;

        let account = self
            .repository
            .find_by_id(principal.user_id())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !account.is_active() {
            return Err(AuthServiceError::AccountInactive);
        }

        let tokens = self.tokens.issue_pair(&account, &*self.clock)?;
        Ok(AuthSession { account, tokens })
    }

    /// Changes an account's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::CurrentPasswordMismatch`] when the
    /// current password is wrong, and [`AuthServiceError::Domain`] when the
    /// new password violates the length policy.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AuthServiceResult<()> {
        let mut account = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserRepositoryError::NotFound(user_id))?;

        let verified =
            verify_blocking(account.password().clone(), current_password.to_owned()).await?;
        if !verified {
            return Err(AuthServiceError::CurrentPasswordMismatch);
        }

        let hash = hash_blocking(new_password.to_owned()).await?;
        account.set_password(hash, &*self.clock);
        self.repository.update(&account).await?;
        Ok(())
    }

    /// Returns the account behind a principal, if it still exists.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn profile(&self, user_id: UserId) -> AuthServiceResult<Option<UserAccount>> {
        Ok(self.repository.find_by_id(user_id).await?)
    }
}

/// Runs bcrypt verification on the blocking pool.
async fn verify_blocking(
    digest: PasswordHash,
    candidate: String,
) -> Result<bool, IdentityDomainError> {
    tokio::task::spawn_blocking(move || digest.verify(&candidate))
        .await
        .map_err(|err| IdentityDomainError::Hashing(err.to_string()))?
}

/// Runs bcrypt hashing on the blocking pool.
async fn hash_blocking(plaintext: String) -> Result<PasswordHash, IdentityDomainError> {
    tokio::task::spawn_blocking(move || PasswordHash::from_plaintext(&plaintext))
        .await
        .map_err(|err| IdentityDomainError::Hashing(err.to_string()))?
}
