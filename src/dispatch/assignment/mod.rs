//! Multi-technician assignment engine.
//!
//! Partitions a day's stops across technicians before per-technician route
//! optimization: skill match is a hard constraint, workload is balanced by
//! estimated on-site minutes, and each technician's shift capacity is a
//! ceiling. Runs before the optimizer so that route quality never trades
//! away a feasibility constraint.

use crate::dispatch::domain::{Stop, TechnicianProfile, UnassignedJob, UnassignedReason};
use std::cmp::Reverse;

/// One technician's share of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The technician receiving the stops.
    pub technician: TechnicianProfile,
    /// Stops allocated to them, in input order.
    pub stops: Vec<Stop>,
}

/// The result of partitioning a day's stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Per-technician allocations; technicians with no stops are included
    /// with an empty list.
    pub assignments: Vec<Assignment>,
    /// Stops no technician could take, with reasons.
    pub unassigned: Vec<UnassignedJob>,
}

/// Greedy skill- and capacity-aware partitioner.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentEngine;

impl AssignmentEngine {
    /// Partitions `stops` across `technicians`.
    ///
    /// Stops are placed from highest priority (then longest service) down.
    /// Each goes to the capable technician with the lightest current load
    /// whose remaining shift capacity fits the stop's service minutes.
    #[must_use]
    pub fn partition(stops: Vec<Stop>, technicians: Vec<TechnicianProfile>) -> Partition {
        let mut ordered = stops;
        ordered.sort_by_key(|stop| (Reverse(stop.priority()), Reverse(stop.service_minutes())));

        let mut loads: Vec<u32> = vec![0; technicians.len()];
        let mut buckets: Vec<Vec<Stop>> = vec![Vec::new(); technicians.len()];
        let mut unassigned = Vec::new();

        for stop in ordered {
            let capable: Vec<usize> = technicians
                .iter()
                .enumerate()
                .filter(|(_, technician)| technician.can_serve(&stop))
                .map(|(index, _)| index)
                .collect();

            if capable.is_empty() {
                unassigned.push(UnassignedJob {
                    job_id: stop.job_id(),
                    reason: UnassignedReason::NoCapableTechnician,
                });
                continue;
            }

            let chosen = capable
                .into_iter()
                .filter(|&index| {
                    let load = loads.get(index).copied().unwrap_or(u32::MAX);
                    let capacity = technicians
                        .get(index)
                        .map_or(0, TechnicianProfile::shift_minutes);
                    load.saturating_add(stop.service_minutes()) <= capacity
                })
                .min_by_key(|&index| loads.get(index).copied().unwrap_or(u32::MAX));

            let Some(index) = chosen else {
                unassigned.push(UnassignedJob {
                    job_id: stop.job_id(),
                    reason: UnassignedReason::CapacityExhausted,
                });
                continue;
            };

            if let (Some(load), Some(bucket)) = (loads.get_mut(index), buckets.get_mut(index)) {
                *load += stop.service_minutes();
                bucket.push(stop);
            }
        }

        let assignments = technicians
            .into_iter()
            .zip(buckets)
            .map(|(technician, stops)| Assignment { technician, stops })
            .collect();

        Partition {
            assignments,
            unassigned,
        }
    }
}
