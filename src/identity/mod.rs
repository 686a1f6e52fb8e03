//! User accounts, roles, and authentication for Fieldline.
//!
//! Covers registration and admin-gated account management, bcrypt
//! credential verification, and HS256 access/refresh token handling. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
