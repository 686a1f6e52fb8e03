//! Domain types for user accounts, roles, and credentials.

mod account;
mod credentials;
mod email;
mod error;
mod ids;
mod principal;
mod role;
mod skill;
mod status;

pub use account::{DisplayName, PersistedUserData, UserAccount};
pub use principal::AuthenticatedPrincipal;
pub use credentials::PasswordHash;
pub use email::EmailAddress;
pub use error::{IdentityDomainError, ParseAccountStatusError, ParseRoleError};
pub use ids::UserId;
pub use role::{Permission, UserRole};
pub use skill::SkillTag;
pub use status::AccountStatus;
