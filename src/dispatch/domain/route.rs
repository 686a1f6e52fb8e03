//! Optimized routes, persisted route plans, and plan-level results.

use super::{RoutePlanId, Stop};
use crate::identity::domain::UserId;
use crate::job::domain::JobId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned while parsing route orderings from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown route ordering: {0}")]
pub struct ParseRouteOrderingError(pub String);

/// How the stop sequence of a route was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOrdering {
    /// Nearest-neighbour construction refined by 2-opt.
    Optimized,
    /// Input order kept because pairwise travel data was incomplete.
    Identity,
}

impl RouteOrdering {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimized => "optimized",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for RouteOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RouteOrdering {
    type Error = ParseRouteOrderingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "optimized" => Ok(Self::Optimized),
            "identity" => Ok(Self::Identity),
            _ => Err(ParseRouteOrderingError(value.to_owned())),
        }
    }
}

/// Aggregate travel and cost figures for one route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Total driving distance in metres.
    pub distance_meters: u64,
    /// Total driving time in seconds.
    pub travel_seconds: u64,
    /// Total on-site service time in minutes.
    pub service_minutes: u32,
    /// Estimated fuel cost in cents.
    pub fuel_cost_cents: u64,
}

/// A stop with its position in the visiting order resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledStop {
    /// The routed stop.
    pub stop: Stop,
    /// Minutes after shift start at which the technician arrives.
    pub arrival_offset_minutes: u32,
}

/// One technician's optimized visiting order with aggregate metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedRoute {
    technician: UserId,
    technician_name: String,
    stops: Vec<ScheduledStop>,
    metrics: RouteMetrics,
    ordering: RouteOrdering,
}

impl OptimizedRoute {
    /// Assembles an optimized route from solver output.
    #[must_use]
    pub const fn new(
        technician: UserId,
        technician_name: String,
        stops: Vec<ScheduledStop>,
        metrics: RouteMetrics,
        ordering: RouteOrdering,
    ) -> Self {
        Self {
            technician,
            technician_name,
            stops,
            metrics,
            ordering,
        }
    }

    /// Returns the technician this route belongs to.
    #[must_use]
    pub const fn technician(&self) -> UserId {
        self.technician
    }

    /// Returns the technician's display name.
    #[must_use]
    pub fn technician_name(&self) -> &str {
        &self.technician_name
    }

    /// Returns the ordered stops.
    #[must_use]
    pub fn stops(&self) -> &[ScheduledStop] {
        &self.stops
    }

    /// Returns the aggregate metrics.
    #[must_use]
    pub const fn metrics(&self) -> RouteMetrics {
        self.metrics
    }

    /// Returns how the ordering was produced.
    #[must_use]
    pub const fn ordering(&self) -> RouteOrdering {
        self.ordering
    }
}

/// Why a job could not be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// The customer site has no geocoded coordinates.
    MissingCoordinates,
    /// No technician has the required skills.
    NoCapableTechnician,
    /// Every capable technician's shift is already full.
    CapacityExhausted,
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingCoordinates => "customer site has no coordinates",
            Self::NoCapableTechnician => "no technician has the required skills",
            Self::CapacityExhausted => "all capable technicians are at capacity",
        };
        f.write_str(text)
    }
}

/// A job left out of the plan, with the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedJob {
    /// The job that could not be routed.
    pub job_id: JobId,
    /// Why it was left out.
    pub reason: UnassignedReason,
}

/// The full result of planning one service date.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    service_date: NaiveDate,
    routes: Vec<OptimizedRoute>,
    unassigned: Vec<UnassignedJob>,
    generated_at: DateTime<Utc>,
}

impl DispatchPlan {
    /// Assembles a dispatch plan.
    #[must_use]
    pub const fn new(
        service_date: NaiveDate,
        routes: Vec<OptimizedRoute>,
        unassigned: Vec<UnassignedJob>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            service_date,
            routes,
            unassigned,
            generated_at,
        }
    }

    /// Returns the planned service date.
    #[must_use]
    pub const fn service_date(&self) -> NaiveDate {
        self.service_date
    }

    /// Returns the per-technician routes.
    #[must_use]
    pub fn routes(&self) -> &[OptimizedRoute] {
        &self.routes
    }

    /// Returns the jobs the plan could not place.
    #[must_use]
    pub fn unassigned(&self) -> &[UnassignedJob] {
        &self.unassigned
    }

    /// Returns the generation timestamp.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

/// One persisted stop of a route plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStop {
    /// The routed job.
    pub job_id: JobId,
    /// Minutes after shift start at which the technician arrives.
    pub arrival_offset_minutes: u32,
}

/// Persisted route plan aggregate: one technician's ordered jobs for a
/// service date, unique per `(technician, date)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    id: RoutePlanId,
    technician: UserId,
    service_date: NaiveDate,
    stops: Vec<PlannedStop>,
    metrics: RouteMetrics,
    ordering: RouteOrdering,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted route plan.
#[derive(Debug, Clone)]
pub struct PersistedRoutePlanData {
    /// Persisted plan identifier.
    pub id: RoutePlanId,
    /// Persisted technician.
    pub technician: UserId,
    /// Persisted service date.
    pub service_date: NaiveDate,
    /// Persisted ordered stops.
    pub stops: Vec<PlannedStop>,
    /// Persisted aggregate metrics.
    pub metrics: RouteMetrics,
    /// Persisted ordering marker.
    pub ordering: RouteOrdering,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl RoutePlan {
    /// Captures an optimized route as a persistable plan for a date.
    #[must_use]
    pub fn from_route(route: &OptimizedRoute, service_date: NaiveDate, clock: &impl Clock) -> Self {
        let stops = route
            .stops()
            .iter()
            .map(|scheduled| PlannedStop {
                job_id: scheduled.stop.job_id(),
                arrival_offset_minutes: scheduled.arrival_offset_minutes,
            })
            .collect();

        Self {
            id: RoutePlanId::new(),
            technician: route.technician(),
            service_date,
            stops,
            metrics: route.metrics(),
            ordering: route.ordering(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a route plan from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRoutePlanData) -> Self {
        Self {
            id: data.id,
            technician: data.technician,
            service_date: data.service_date,
            stops: data.stops,
            metrics: data.metrics,
            ordering: data.ordering,
            created_at: data.created_at,
        }
    }

    /// Returns the plan identifier.
    #[must_use]
    pub const fn id(&self) -> RoutePlanId {
        self.id
    }

    /// Returns the technician this plan belongs to.
    #[must_use]
    pub const fn technician(&self) -> UserId {
        self.technician
    }

    /// Returns the planned service date.
    #[must_use]
    pub const fn service_date(&self) -> NaiveDate {
        self.service_date
    }

    /// Returns the ordered stops.
    #[must_use]
    pub fn stops(&self) -> &[PlannedStop] {
        &self.stops
    }

    /// Returns the aggregate metrics.
    #[must_use]
    pub const fn metrics(&self) -> RouteMetrics {
        self.metrics
    }

    /// Returns how the ordering was produced.
    #[must_use]
    pub const fn ordering(&self) -> RouteOrdering {
        self.ordering
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
