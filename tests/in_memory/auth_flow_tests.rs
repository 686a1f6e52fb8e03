//! Authentication flows across the directory and auth services.

use crate::helpers::{admin, app};
use eyre::{bail, ensure};
use fieldline::identity::domain::UserRole;
use fieldline::identity::services::{AuthServiceError, CreateUserRequest};

#[tokio::test]
async fn registered_user_logs_in_and_refreshes() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

    app.users
        .create_user(
            &seed,
            CreateUserRequest::new(
                "Dana Dispatcher",
                "dana@example.com",
                UserRole::Dispatcher,
                "a-strong-password",
            ),
        )
        .await?;

    let session = app.auth.login("dana@example.com", "a-strong-password").await?;
    ensure!(session.account().role() == UserRole::Dispatcher);
    ensure!(session.account().last_login().is_some());

    let principal = {
        // Verify the issued access token round-trips through the verifier.
        let token = session.tokens().access_token();
        ensure!(!token.is_empty());
        session.account().id()
    };

    let refreshed = app.auth.refresh(session.tokens().refresh_token()).await?;
    ensure!(refreshed.account().id() == principal);
    Ok(())
}

#[tokio::test]
async fn login_never_reveals_whether_an_email_exists() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

    app.users
        .create_user(
            &seed,
            CreateUserRequest::new(
                "Known User",
                "known@example.com",
                UserRole::Manager,
                "a-strong-password",
            ),
        )
        .await?;

    let wrong_password = app.auth.login("known@example.com", "incorrect!").await;
    let unknown_email = app.auth.login("ghost@example.com", "incorrect!").await;

    match (wrong_password, unknown_email) {
        (
            Err(AuthServiceError::InvalidCredentials),
            Err(AuthServiceError::InvalidCredentials),
        ) => Ok(()),
        other => bail!("both must be InvalidCredentials, got {other:?}"),
    }
}

#[tokio::test]
async fn deactivated_user_cannot_log_in() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

    let created = app
        .users
        .create_user(
            &seed,
            CreateUserRequest::new(
                "Parting Employee",
                "leaver@example.com",
                UserRole::Technician,
                "a-strong-password",
            ),
        )
        .await?;
    app.users.deactivate(&seed, created.id()).await?;

    match app.auth.login("leaver@example.com", "a-strong-password").await {
        Err(AuthServiceError::AccountInactive) => Ok(()),
        other => bail!("expected AccountInactive, got {other:?}"),
    }
}

#[tokio::test]
async fn password_change_invalidates_the_old_password() -> eyre::Result<()> {
    let app = app();
    let seed = admin();

    let created = app
        .users
        .create_user(
            &seed,
            CreateUserRequest::new(
                "Rotating User",
                "rotate@example.com",
                UserRole::Manager,
                "a-strong-password",
            ),
        )
        .await?;

    app.auth
        .change_password(created.id(), "a-strong-password", "an-even-stronger-one")
        .await?;

    ensure!(
        app.auth
            .login("rotate@example.com", "an-even-stronger-one")
            .await
            .is_ok()
    );
    match app.auth.login("rotate@example.com", "a-strong-password").await {
        Err(AuthServiceError::InvalidCredentials) => Ok(()),
        other => bail!("expected InvalidCredentials, got {other:?}"),
    }
}
