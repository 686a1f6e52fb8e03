//! Plain-text route sheet rendering for dispatchers.

use crate::dispatch::domain::{DispatchPlan, OptimizedRoute, UnassignedJob};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// The route sheet template. One block per technician, one line per stop,
/// with unplaced jobs listed at the end.
const ROUTE_SHEET_TEMPLATE: &str = "\
Route sheet — {{ date }}
{% for route in routes %}
{{ route.technician }} ({{ route.ordering }}): {{ route.stop_count }} stops, \
{{ route.distance_km }} km, {{ route.travel_minutes }} min driving, \
fuel ~{{ route.fuel_cost }}
{%- for stop in route.stops %}
  {{ loop.index }}. job {{ stop.job }} — arrive +{{ stop.arrival_offset_minutes }} min, \
{{ stop.service_minutes }} min on site
{%- endfor %}
{% endfor %}
{%- if unassigned %}
Unplaced jobs:
{%- for item in unassigned %}
  - job {{ item.job }}: {{ item.reason }}
{%- endfor %}
{%- endif %}
";

/// Errors returned while rendering a route sheet.
#[derive(Debug, Error)]
pub enum RouteSheetError {
    /// Template rendering failed.
    #[error("route sheet rendering failed: {0}")]
    Render(#[from] minijinja::Error),
}

#[derive(Debug, Serialize)]
struct SheetView {
    date: String,
    routes: Vec<RouteView>,
    unassigned: Vec<UnassignedView>,
}

#[derive(Debug, Serialize)]
struct RouteView {
    technician: String,
    ordering: String,
    stop_count: usize,
    distance_km: String,
    travel_minutes: u64,
    fuel_cost: String,
    stops: Vec<StopView>,
}

#[derive(Debug, Serialize)]
struct StopView {
    job: String,
    arrival_offset_minutes: u32,
    service_minutes: u32,
}

#[derive(Debug, Serialize)]
struct UnassignedView {
    job: String,
    reason: String,
}

/// Renders dispatch plans to dispatcher-facing plain text.
#[derive(Debug)]
pub struct RouteSheetRenderer {
    env: Environment<'static>,
}

impl Default for RouteSheetRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteSheetRenderer {
    /// Creates a renderer with the built-in template.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Registration only fails on a template syntax error, which the
        // rendering tests pin down against the embedded source.
        if env.add_template("route_sheet", ROUTE_SHEET_TEMPLATE).is_err() {
            tracing::error!("route sheet template failed to compile");
        }
        Self { env }
    }

    /// Renders a plan to plain text.
    ///
    /// # Errors
    ///
    /// Returns [`RouteSheetError::Render`] when template evaluation fails.
    pub fn render(&self, plan: &DispatchPlan) -> Result<String, RouteSheetError> {
        let view = SheetView {
            date: plan.service_date().to_string(),
            routes: plan.routes().iter().map(route_view).collect(),
            unassigned: plan.unassigned().iter().map(unassigned_view).collect(),
        };

        let template = self.env.get_template("route_sheet")?;
        Ok(template.render(minijinja::value::Value::from_serialize(&view))?)
    }
}

fn route_view(route: &OptimizedRoute) -> RouteView {
    let metrics = route.metrics();
    RouteView {
        technician: route.technician_name().to_owned(),
        ordering: route.ordering().to_string(),
        stop_count: route.stops().len(),
        distance_km: format!("{:.1}", metrics.distance_meters as f64 / 1000.0),
        travel_minutes: metrics.travel_seconds.div_ceil(60),
        fuel_cost: format_cents(metrics.fuel_cost_cents),
        stops: route
            .stops()
            .iter()
            .map(|scheduled| StopView {
                job: scheduled.stop.job_id().to_string(),
                arrival_offset_minutes: scheduled.arrival_offset_minutes,
                service_minutes: scheduled.stop.service_minutes(),
            })
            .collect(),
    }
}

fn unassigned_view(item: &UnassignedJob) -> UnassignedView {
    UnassignedView {
        job: item.job_id.to_string(),
        reason: item.reason.to_string(),
    }
}

fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
