//! Unit tests for the identity context.


use crate::identity::domain::{
    DisplayName, EmailAddress, PasswordHash, UserAccount, UserRole,
};
use mockable::DefaultClock;
use once_cell::sync::Lazy;

/// Plaintext used by every test account.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

// Bcrypt hashing is deliberately slow; do it once for the whole suite.
static TEST_HASH: Lazy<PasswordHash> = Lazy::new(|| {
    PasswordHash::from_plaintext(TEST_PASSWORD)
        .unwrap_or_else(|err| panic!("test password should hash: {err}"))
});

/// Builds an active account with the shared test password.
pub fn account_with_role(email: &str, role: UserRole) -> eyre::Result<UserAccount> {
    let name = DisplayName::new("Test User").map_err(|err| eyre::eyre!(err))?;
    let email = EmailAddress::new(email).map_err(|err| eyre::eyre!(err))?;
    Ok(UserAccount::register(
        name,
        email,
        role,
        TEST_HASH.clone(),
        &DefaultClock,
    ))
}
