//! Optimization mode, tuning options, and the fuel cost model.

use super::TravelLeg;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned while parsing optimization modes from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown optimization mode: {0}")]
pub struct ParseOptimizeModeError(pub String);

/// The cost dimension the optimizer minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeMode {
    /// Minimize total driving distance.
    Distance,
    /// Minimize total driving time.
    Time,
}

impl OptimizeMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for OptimizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OptimizeMode {
    type Error = ParseOptimizeModeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "distance" => Ok(Self::Distance),
            "time" => Ok(Self::Time),
            _ => Err(ParseOptimizeModeError(value.to_owned())),
        }
    }
}

/// Tuning knobs for a single optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOptions {
    /// Cost dimension to minimize.
    pub mode: OptimizeMode,
    /// Inflate time costs by the peak factor.
    pub traffic_aware: bool,
    /// Multiplier applied to travel times under traffic awareness.
    pub traffic_peak_factor: f64,
    /// Speed assumption for estimating legs the matrix is missing, km/h.
    pub fallback_speed_kmh: f64,
    /// Upper bound on 2-opt refinement sweeps.
    pub max_refinement_passes: usize,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            mode: OptimizeMode::Distance,
            traffic_aware: false,
            traffic_peak_factor: 1.25,
            fallback_speed_kmh: 40.0,
            max_refinement_passes: 100,
        }
    }
}

impl OptimizeOptions {
    /// Returns the scalar cost of a leg under these options.
    #[must_use]
    pub fn leg_cost(&self, leg: TravelLeg) -> u64 {
        match self.mode {
            OptimizeMode::Distance => u64::from(leg.meters),
            OptimizeMode::Time => {
                if self.traffic_aware {
                    let inflated = f64::from(leg.seconds) * self.traffic_peak_factor;
                    inflated.round().max(0.0) as u64
                } else {
                    u64::from(leg.seconds)
                }
            }
        }
    }
}

/// Converts driven distance into an estimated fuel cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelModel {
    /// Fuel price in cents per litre.
    pub price_cents_per_litre: u32,
    /// Vehicle consumption in litres per 100 km.
    pub litres_per_100_km: f64,
}

impl FuelModel {
    /// Estimated fuel cost in cents for a driven distance.
    #[must_use]
    pub fn cost_cents(&self, distance_meters: u64) -> u64 {
        let km = distance_meters as f64 / 1000.0;
        let litres = km * self.litres_per_100_km / 100.0;
        let cents = litres * f64::from(self.price_cents_per_litre);
        cents.round().max(0.0) as u64
    }
}

impl Default for FuelModel {
    fn default() -> Self {
        Self {
            price_cents_per_litre: 180,
            litres_per_100_km: 9.5,
        }
    }
}
