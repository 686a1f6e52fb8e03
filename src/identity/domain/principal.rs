//! The authenticated actor attached to a verified request.

use super::{Permission, UserId, UserRole};

/// Identity and role extracted from a verified access token.
///
/// Services take a principal on every gated operation and check the
/// required [`Permission`] before touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    user_id: UserId,
    role: UserRole,
}

impl AuthenticatedPrincipal {
    /// Creates a principal from a verified identity and role.
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns `true` when the principal's role carries the permission.
    #[must_use]
    pub const fn grants(&self, permission: Permission) -> bool {
        self.role.grants(permission)
    }
}
