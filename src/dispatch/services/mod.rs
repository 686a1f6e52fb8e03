//! Orchestration services for the dispatch context.

mod planning;
mod route_sheet;

pub use planning::{DispatchPlanningService, PlanRequest, PlanningError, PlanningResult};
pub use route_sheet::{RouteSheetError, RouteSheetRenderer};
