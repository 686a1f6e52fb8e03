//! Geographic primitives shared by the customer, dispatch, and tracking
//! contexts.
//!
//! Coordinates are validated on construction so that downstream code can
//! treat a [`GeoPoint`] as always being a plausible position on Earth.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mean Earth radius in metres, as used by the great-circle estimate.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Errors returned while constructing geographic values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeoError {
    /// The latitude is outside the `[-90, 90]` degree range.
    #[error("latitude {0} is outside the [-90, 90] range")]
    LatitudeOutOfRange(f64),

    /// The longitude is outside the `[-180, 180]` degree range.
    #[error("longitude {0} is outside the [-180, 180] range")]
    LongitudeOutOfRange(f64),

    /// A coordinate component is NaN or infinite.
    #[error("coordinate components must be finite")]
    NotFinite,
}

/// A validated WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint", into = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a validated coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::NotFinite`] when either component is NaN or
    /// infinite, [`GeoError::LatitudeOutOfRange`] or
    /// [`GeoError::LongitudeOutOfRange`] when a component falls outside its
    /// valid degree range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// Uses the haversine formula; accurate to well under a percent at the
    /// scale of a service territory, which is all route estimation needs.
    #[must_use]
    pub fn distance_meters(self, other: Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_METERS * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Unvalidated serde carrier for [`GeoPoint`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawGeoPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}
