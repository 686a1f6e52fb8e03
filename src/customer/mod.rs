//! Customer records for Fieldline.
//!
//! Customers are the sites field work happens at: a structured postal
//! address plus optional geocoded coordinates that the dispatch planner
//! uses as stop locations. The module follows hexagonal architecture:
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
