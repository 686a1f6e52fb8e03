//! Route stops and the technicians who serve them.

use crate::geo::GeoPoint;
use crate::identity::domain::{SkillTag, UserId};
use crate::job::domain::{JobId, JobPriority};
use serde::{Deserialize, Serialize};

/// One service stop to be routed: a job projected down to what the
/// optimizer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    job_id: JobId,
    location: GeoPoint,
    service_minutes: u32,
    priority: JobPriority,
    required_skills: Vec<SkillTag>,
}

impl Stop {
    /// Creates a stop from job data.
    #[must_use]
    pub const fn new(
        job_id: JobId,
        location: GeoPoint,
        service_minutes: u32,
        priority: JobPriority,
        required_skills: Vec<SkillTag>,
    ) -> Self {
        Self {
            job_id,
            location,
            service_minutes,
            priority,
            required_skills,
        }
    }

    /// Returns the underlying job.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the stop location.
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        self.location
    }

    /// Returns the estimated on-site minutes.
    #[must_use]
    pub const fn service_minutes(&self) -> u32 {
        self.service_minutes
    }

    /// Returns the scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> JobPriority {
        self.priority
    }

    /// Returns the skills a technician needs for this stop.
    #[must_use]
    pub fn required_skills(&self) -> &[SkillTag] {
        &self.required_skills
    }
}

/// A technician as the assignment engine sees them: start position,
/// capabilities, and remaining shift capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianProfile {
    user_id: UserId,
    display_name: String,
    start: GeoPoint,
    skills: Vec<SkillTag>,
    shift_minutes: u32,
}

impl TechnicianProfile {
    /// Creates a technician profile.
    #[must_use]
    pub const fn new(
        user_id: UserId,
        display_name: String,
        start: GeoPoint,
        skills: Vec<SkillTag>,
        shift_minutes: u32,
    ) -> Self {
        Self {
            user_id,
            display_name,
            start,
            skills,
            shift_minutes,
        }
    }

    /// Returns the technician's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the technician's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the route start position.
    #[must_use]
    pub const fn start(&self) -> GeoPoint {
        self.start
    }

    /// Returns the technician's skill tags.
    #[must_use]
    pub fn skills(&self) -> &[SkillTag] {
        &self.skills
    }

    /// Returns the shift capacity in on-site minutes.
    #[must_use]
    pub const fn shift_minutes(&self) -> u32 {
        self.shift_minutes
    }

    /// Returns `true` when this technician has every skill the stop needs.
    #[must_use]
    pub fn can_serve(&self, stop: &Stop) -> bool {
        stop.required_skills()
            .iter()
            .all(|required| self.skills.contains(required))
    }
}
