//! Great-circle travel estimator.
//!
//! Prices every pair from straight-line distance and an assumed average
//! speed. Less accurate than a road-network table service but always
//! available, which makes it both the default estimator and the fallback
//! when the table service is down.

use crate::dispatch::domain::{TravelLeg, TravelMatrix};
use crate::dispatch::ports::{EstimatorError, TravelEstimator};
use crate::geo::GeoPoint;

/// Default average driving speed assumption.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Haversine-based travel estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaversineEstimator {
    speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    /// Creates an estimator with the given average speed in km/h.
    ///
    /// Non-positive speeds fall back to the default.
    #[must_use]
    pub fn new(speed_kmh: f64) -> Self {
        if speed_kmh > 0.0 {
            Self { speed_kmh }
        } else {
            Self::default()
        }
    }

    /// Prices a single pair.
    #[must_use]
    pub fn leg(&self, from: GeoPoint, to: GeoPoint) -> TravelLeg {
        let meters = from.distance_meters(to);
        let seconds = meters / 1000.0 / self.speed_kmh * 3600.0;
        TravelLeg {
            meters: meters.round().max(0.0) as u32,
            seconds: seconds.round().max(0.0) as u32,
        }
    }
}

impl TravelEstimator for HaversineEstimator {
    fn travel_matrix(&self, points: &[GeoPoint]) -> Result<TravelMatrix, EstimatorError> {
        let mut matrix = TravelMatrix::new(points.len());
        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                let leg = self.leg(*from, *to);
                matrix
                    .set_leg(i, j, leg)
                    .map_err(|err| EstimatorError::MalformedResponse(err.to_string()))?;
            }
        }
        Ok(matrix)
    }
}
