//! Route planning for Fieldline.
//!
//! Implements the dispatch pipeline in process rather than delegating to
//! an external optimization endpoint: a collector gathers pending jobs and
//! active technicians for a date, a travel estimator prices pairwise legs
//! (great-circle locally, or an OSRM-style table service with retry), an
//! assignment engine partitions stops across technicians under skill and
//! shift-capacity constraints, a nearest-neighbour + 2-opt solver orders
//! each route, and the results are persisted per `(technician, date)` and
//! rendered to dispatcher-facing route sheets.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Estimator implementations in [`estimator`]
//! - The route solver in [`solver`] and the partitioner in [`assignment`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod assignment;
pub mod domain;
pub mod estimator;
pub mod ports;
pub mod services;
pub mod solver;

#[cfg(test)]
mod tests;
