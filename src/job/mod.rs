//! Job lifecycle management for Fieldline.
//!
//! A job is a scheduled unit of field work tied to a customer: intake,
//! technician assignment, status transitions through an explicit lifecycle
//! table, and the dispatch queries route planning builds on. Jobs are never
//! hard-deleted; cancellation is the soft terminal path. The module follows
//! hexagonal architecture:
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
