//! Append-only action auditing for Fieldline.
//!
//! Every privileged operation leaves a write-once record of who did what
//! to which resource, from where, and when. The port exposes append and
//! query only; no update or delete path exists anywhere in the crate.
//! The module follows hexagonal architecture:
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
mod tests;
