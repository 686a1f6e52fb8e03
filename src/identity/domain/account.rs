//! User account aggregate root.

use super::{
    AccountStatus, EmailAddress, IdentityDomainError, PasswordHash, SkillTag, UserId, UserRole,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a display name, matching the `VARCHAR(120)` column.
const MAX_DISPLAY_NAME_LENGTH: usize = 120;

/// Validated human-readable name for a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a validated display name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyDisplayName`] when the value is
    /// empty after trimming or [`IdentityDomainError::DisplayNameTooLong`]
    /// when it exceeds 120 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(IdentityDomainError::EmptyDisplayName);
        }
        if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(IdentityDomainError::DisplayNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the display name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User account aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    role: UserRole,
    status: AccountStatus,
    skills: Vec<SkillTag>,
    password: PasswordHash,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user account.
#[derive(Debug, Clone)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: DisplayName,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted role.
    pub role: UserRole,
    /// Persisted lifecycle status.
    pub status: AccountStatus,
    /// Persisted skill tags.
    pub skills: Vec<SkillTag>,
    /// Persisted password digest.
    pub password: PasswordHash,
    /// Persisted most recent login timestamp, if any.
    pub last_login: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Creates a new active account.
    #[must_use]
    pub fn register(
        name: DisplayName,
        email: EmailAddress,
        role: UserRole,
        password: PasswordHash,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            name,
            email,
            role,
            status: AccountStatus::Active,
            skills: Vec::new(),
            password,
            last_login: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an account from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            role: data.role,
            status: data.status,
            skills: data.skills,
            password: data.password,
            last_login: data.last_login,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the assigned role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        self.status
    }

    /// Returns the technician skill tags.
    #[must_use]
    pub fn skills(&self) -> &[SkillTag] {
        &self.skills
    }

    /// Returns the password hash.
    #[must_use]
    pub const fn password(&self) -> &PasswordHash {
        &self.password
    }

    /// Returns the most recent login timestamp, if any.
    #[must_use]
    pub const fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the account may authenticate and act.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Returns `true` when the account is an active technician.
    #[must_use]
    pub fn is_active_technician(&self) -> bool {
        self.is_active() && self.role == UserRole::Technician
    }

    /// Stamps a successful login.
    pub fn record_login(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.last_login = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Replaces the password hash.
    pub fn set_password(&mut self, password: PasswordHash, clock: &impl Clock) {
        self.password = password;
        self.touch(clock);
    }

    /// Changes the assigned role.
    pub fn change_role(&mut self, role: UserRole, clock: &impl Clock) {
        self.role = role;
        self.touch(clock);
    }

    /// Replaces the skill tags.
    pub fn set_skills(&mut self, skills: Vec<SkillTag>, clock: &impl Clock) {
        self.skills = skills;
        self.touch(clock);
    }

    /// Deactivates the account. Idempotent.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.status = AccountStatus::Inactive;
        self.touch(clock);
    }

    /// Reactivates the account. Idempotent.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.status = AccountStatus::Active;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
