//! Domain types for route planning and dispatch.

mod ids;
mod matrix;
mod mode;
mod route;
mod stop;

pub use ids::RoutePlanId;
pub use matrix::{MatrixBoundsError, TravelLeg, TravelMatrix};
pub use mode::{FuelModel, OptimizeMode, OptimizeOptions, ParseOptimizeModeError};
pub use route::{
    DispatchPlan, OptimizedRoute, ParseRouteOrderingError, PersistedRoutePlanData, PlannedStop,
    RouteMetrics, RouteOrdering, RoutePlan, ScheduledStop, UnassignedJob, UnassignedReason,
};
pub use stop::{Stop, TechnicianProfile};
