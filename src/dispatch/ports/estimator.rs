//! Port for pairwise travel cost estimation.

use crate::dispatch::domain::TravelMatrix;
use crate::geo::GeoPoint;
use thiserror::Error;

/// Errors returned by travel estimators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EstimatorError {
    /// The upstream service could not be reached or returned a failure
    /// status after retries were exhausted.
    #[error("travel estimation transport failure: {0}")]
    Transport(String),

    /// The upstream service answered with a payload that does not match
    /// the requested points.
    #[error("malformed travel estimation response: {0}")]
    MalformedResponse(String),
}

/// Produces a pairwise travel cost matrix for a set of points.
///
/// Implementations are synchronous and CPU- or IO-bound; callers run them
/// on the blocking pool. Cells an implementation cannot price stay `None`.
pub trait TravelEstimator: Send + Sync {
    /// Builds the full matrix for `points`, indexed by their order.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError`] when the estimate source fails entirely;
    /// a partially priced matrix is a success with `None` cells.
    fn travel_matrix(&self, points: &[GeoPoint]) -> Result<TravelMatrix, EstimatorError>;
}
