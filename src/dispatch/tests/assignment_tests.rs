//! Unit tests for the assignment engine.

use crate::dispatch::assignment::AssignmentEngine;
use crate::dispatch::domain::{TechnicianProfile, UnassignedReason};
use crate::geo::GeoPoint;
use crate::identity::domain::{SkillTag, UserId};
use crate::job::domain::JobPriority;
use eyre::ensure;

use super::{point, stop_at};

fn technician_with_capacity(
    name: &str,
    start: GeoPoint,
    skills: &[&str],
    shift_minutes: u32,
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
        shift_minutes,
    ))
}

#[test]
fn skill_requirements_are_a_hard_constraint() -> eyre::Result<()> {
    let base = point(47.0, 8.0)?;
    let hvac_tech = technician_with_capacity("Hvac", base, &["hvac"], 480)?;
    let fiber_tech = technician_with_capacity("Fiber", base, &["fiber_splicing"], 480)?;

    let hvac_stop = stop_at(base, 60, JobPriority::Medium, &["hvac"])?;
    let expected_job = hvac_stop.job_id();

    let partition =
        AssignmentEngine::partition(vec![hvac_stop], vec![hvac_tech.clone(), fiber_tech]);

    ensure!(partition.unassigned.is_empty());
    let holder = partition
        .assignments
        .iter()
        .find(|assignment| !assignment.stops.is_empty())
        .ok_or_else(|| eyre::eyre!("one technician should hold the stop"))?;
    ensure!(holder.technician.user_id() == hvac_tech.user_id());
    ensure!(holder.stops.iter().all(|stop| stop.job_id() == expected_job));
    Ok(())
}

#[test]
fn unmatched_skills_report_no_capable_technician() -> eyre::Result<()> {
    let base = point(47.0, 8.0)?;
    let technician = technician_with_capacity("Generalist", base, &[], 480)?;
    let exotic = stop_at(base, 30, JobPriority::High, &["crane_rigging"])?;
    let exotic_id = exotic.job_id();

    let partition = AssignmentEngine::partition(vec![exotic], vec![technician]);

    ensure!(partition.assignments.iter().all(|a| a.stops.is_empty()));
    ensure!(partition.unassigned.len() == 1);
    ensure!(partition.unassigned.iter().all(|item| {
        item.job_id == exotic_id && item.reason == UnassignedReason::NoCapableTechnician
    }));
    Ok(())
}

#[test]
fn shift_capacity_is_a_ceiling() -> eyre::Result<()> {
    let base = point(47.0, 8.0)?;
    let technician = technician_with_capacity("Short shift", base, &[], 60)?;

    let first = stop_at(base, 40, JobPriority::High, &[])?;
    let second = stop_at(base, 40, JobPriority::Low, &[])?;

    let partition = AssignmentEngine::partition(vec![first, second], vec![technician]);

    let placed: usize = partition
        .assignments
        .iter()
        .map(|assignment| assignment.stops.len())
        .sum();
    ensure!(placed == 1);
    ensure!(partition.unassigned.len() == 1);
    ensure!(
        partition
            .unassigned
            .iter()
            .all(|item| item.reason == UnassignedReason::CapacityExhausted)
    );
    Ok(())
}

#[test]
fn high_priority_stops_claim_capacity_first() -> eyre::Result<()> {
    let base = point(47.0, 8.0)?;
    let technician = technician_with_capacity("Busy", base, &[], 60)?;

    let low = stop_at(base, 60, JobPriority::Low, &[])?;
    let high = stop_at(base, 60, JobPriority::High, &[])?;
    let high_id = high.job_id();

    // Low priority comes first in input order; placement order must not
    // follow it.
    let partition = AssignmentEngine::partition(vec![low, high], vec![technician]);

    let placed: Vec<_> = partition
        .assignments
        .iter()
        .flat_map(|assignment| &assignment.stops)
        .collect();
    ensure!(placed.len() == 1);
    ensure!(placed.iter().all(|stop| stop.job_id() == high_id));
    Ok(())
}

#[test]
fn workload_is_balanced_by_service_minutes() -> eyre::Result<()> {
    let base = point(47.0, 8.0)?;
    let one = technician_with_capacity("One", base, &[], 480)?;
    let two = technician_with_capacity("Two", base, &[], 480)?;

    let stops = vec![
        stop_at(base, 60, JobPriority::Medium, &[])?,
        stop_at(base, 60, JobPriority::Medium, &[])?,
        stop_at(base, 60, JobPriority::Medium, &[])?,
        stop_at(base, 60, JobPriority::Medium, &[])?,
    ];

    let partition = AssignmentEngine::partition(stops, vec![one, two]);

    ensure!(partition.unassigned.is_empty());
    for assignment in &partition.assignments {
        ensure!(
            assignment.stops.len() == 2,
            "expected an even split, got {}",
            assignment.stops.len()
        );
    }
    Ok(())
}

#[test]
fn no_technicians_leaves_everything_unassigned() -> eyre::Result<()> {
    let base = point(47.0, 8.0)?;
    let stop = stop_at(base, 30, JobPriority::Medium, &[])?;

    let partition = AssignmentEngine::partition(vec![stop], Vec::new());

    ensure!(partition.assignments.is_empty());
    ensure!(partition.unassigned.len() == 1);
    ensure!(
        partition
            .unassigned
            .iter()
            .all(|item| item.reason == UnassignedReason::NoCapableTechnician)
    );
    Ok(())
}
