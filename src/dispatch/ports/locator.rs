//! Port for resolving a technician's current position.

use crate::geo::GeoPoint;
use crate::identity::domain::UserId;

/// Supplies the most recent known position of a technician.
///
/// The live tracking registry implements this; planning falls back to the
/// request's depot for technicians with no recent ping.
pub trait TechnicianLocator: Send + Sync {
    /// Returns the latest known position, or `None` when the technician
    /// has not reported one.
    fn locate(&self, technician: UserId) -> Option<GeoPoint>;
}
