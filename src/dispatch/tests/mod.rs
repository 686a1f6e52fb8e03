//! Unit tests for the dispatch context.

mod assignment_tests;
mod planning_tests;

use crate::dispatch::domain::{Stop, TechnicianProfile};
use crate::geo::GeoPoint;
use crate::identity::domain::{SkillTag, UserId};
use crate::job::domain::{JobId, JobPriority};

/// Builds a coordinate, panicking only on programmer error in the test
/// fixture itself.
pub fn point(latitude: f64, longitude: f64) -> eyre::Result<GeoPoint> {
    GeoPoint::new(latitude, longitude).map_err(|err| eyre::eyre!(err))
}

/// Builds a stop with the given location and service length.
pub fn stop_at(
    location: GeoPoint,
    service_minutes: u32,
    priority: JobPriority,
    skills: &[&str],
) -> eyre::Result<Stop> {
    let skills = skills
        .iter()
        .map(|tag| SkillTag::new(*tag).map_err(|err| eyre::eyre!(err)))
        .collect::<eyre::Result<Vec<_>>>()?;
    Ok(Stop::new(
        JobId::new(),
        location,
        service_minutes,
        priority,
        skills,
    ))
}

/// Builds a technician starting at `start` with the given skills and an
/// eight-hour shift.
pub fn technician_at(
    name: &str,
    start: GeoPoint,
    skills: &[&str],
) -> eyre::Result<TechnicianProfile> {
    let skills = skills
        .iter()
        .map(|tag| SkillTag::new(*tag).map_err(|err| eyre::eyre!(err)))
        .collect::<eyre::Result<Vec<_>>>()?;
    Ok(TechnicianProfile::new(
        UserId::new(),
        name.to_owned(),
        start,
        skills,
        480,
    ))
}
