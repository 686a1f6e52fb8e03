//! JWT issuing and verification.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets.
//! Each token carries a `token_use` discriminator so that one kind can
//! never be replayed where the other is expected, even if the two secrets
//! were ever configured to the same value.

use crate::config::AuthTokenConfig;
use crate::identity::domain::{AuthenticatedPrincipal, UserAccount, UserId, UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token signature or structure is invalid.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// The token has expired.
    #[error("token expired")]
    Expired,

    /// An access token was presented where a refresh token was expected,
    /// or vice versa.
    #[error("wrong token use, expected {expected}")]
    WrongTokenUse {
        /// The expected `token_use` discriminator.
        expected: &'static str,
    },

    /// The role claim does not name a known role.
    #[error("unknown role claim: {0}")]
    UnknownRole(String),

    /// Token creation failed.
    #[error("token creation failed: {0}")]
    Creation(String),
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    access_token: String,
    refresh_token: String,
    access_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Returns the access token expiry timestamp.
    #[must_use]
    pub const fn access_expires_at(&self) -> DateTime<Utc> {
        self.access_expires_at
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: String,
    token_use: String,
    iat: i64,
    exp: i64,
}

const ACCESS_USE: &str = "access";
const REFRESH_USE: &str = "refresh";

/// Issues and verifies HS256 token pairs.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Creates a token service from signing configuration.
    #[must_use]
    pub fn new(config: &AuthTokenConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::minutes(config.refresh_ttl_minutes),
        }
    }

    /// Issues an access/refresh pair for an account.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Creation`] when encoding fails.
    pub fn issue_pair(
        &self,
        account: &UserAccount,
        clock: &impl Clock,
    ) -> Result<TokenPair, TokenError> {
        let now = clock.utc();
        let access_expires_at = now + self.access_ttl;

        let access_token = self.sign(
            &self.access_encoding,
            account,
            ACCESS_USE,
            now,
            access_expires_at,
        )?;
        let refresh_token = self.sign(
            &self.refresh_encoding,
            account,
            REFRESH_USE,
            now,
            now + self.refresh_ttl,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
        })
    }

    /// Verifies an access token and returns the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for expired tokens,
    /// [`TokenError::WrongTokenUse`] when a refresh token is presented, and
    /// [`TokenError::Invalid`] for signature or structure failures.
    pub fn verify_access(&self, token: &str) -> Result<AuthenticatedPrincipal, TokenError> {
        self.verify(&self.access_decoding, token, ACCESS_USE)
    }

    /// Verifies a refresh token and returns the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for expired tokens,
    /// [`TokenError::WrongTokenUse`] when an access token is presented, and
    /// [`TokenError::Invalid`] for signature or structure failures.
    pub fn verify_refresh(&self, token: &str) -> Result<AuthenticatedPrincipal, TokenError> {
        self.verify(&self.refresh_decoding, token, REFRESH_USE)
    }

    fn sign(
        &self,
        key: &EncodingKey,
        account: &UserAccount,
        token_use: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account.id().into_inner(),
            role: account.role().as_str().to_owned(),
            token_use: token_use.to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|err| TokenError::Creation(err.to_string()))
    }

    fn verify(
        &self,
        key: &DecodingKey,
        token: &str,
        expected_use: &'static str,
    ) -> Result<AuthenticatedPrincipal, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, key, &validation).map_err(|err| {
            if matches!(
                err.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
            ) {
                TokenError::Expired
            } else {
                TokenError::Invalid(err.to_string())
            }
        })?;

        if data.claims.token_use != expected_use {
            return Err(TokenError::WrongTokenUse {
                expected: expected_use,
            });
        }

        let role = UserRole::try_from(data.claims.role.as_str())
            .map_err(|err| TokenError::UnknownRole(err.0))?;

        Ok(AuthenticatedPrincipal::new(
            UserId::from_uuid(data.claims.sub),
            role,
        ))
    }
}
