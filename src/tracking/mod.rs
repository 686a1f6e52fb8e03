//! Real-time technician location tracking.
//!
//! An in-process registry of the latest known position per technician:
//! field apps publish pings, dashboards subscribe to a broadcast feed and
//! refresh on events, and the dispatch planner reads the latest positions
//! as route starts. Positions are ephemeral by design; nothing here is
//! persisted.

use crate::dispatch::ports::TechnicianLocator;
use crate::geo::GeoPoint;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tokio::sync::broadcast;

/// Default broadcast channel capacity; slow subscribers lag rather than
/// block publishers.
const DEFAULT_FEED_CAPACITY: usize = 256;

/// Errors returned by the tracking registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// The registry lock was poisoned by a panicking writer.
    #[error("location registry lock poisoned: {0}")]
    Poisoned(String),
}

/// One reported technician position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationPing {
    technician: UserId,
    position: GeoPoint,
    recorded_at: DateTime<Utc>,
}

impl LocationPing {
    /// Returns the reporting technician.
    #[must_use]
    pub const fn technician(&self) -> UserId {
        self.technician
    }

    /// Returns the reported position.
    #[must_use]
    pub const fn position(&self) -> GeoPoint {
        self.position
    }

    /// Returns when the position was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// In-process registry of latest technician positions with a broadcast
/// update feed.
#[derive(Debug)]
pub struct LocationRegistry {
    latest: RwLock<HashMap<UserId, LocationPing>>,
    feed: broadcast::Sender<LocationPing>,
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl LocationRegistry {
    /// Creates a registry whose feed buffers up to `capacity` undelivered
    /// updates per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(capacity.max(1));
        Self {
            latest: RwLock::new(HashMap::new()),
            feed,
        }
    }

    /// Publishes a technician position, replacing the previous one and
    /// notifying subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Poisoned`] when the registry lock is
    /// poisoned.
    pub fn publish(
        &self,
        technician: UserId,
        position: GeoPoint,
        clock: &impl Clock,
    ) -> Result<LocationPing, TrackingError> {
        let ping = LocationPing {
            technician,
            position,
            recorded_at: clock.utc(),
        };

        let mut latest = self
            .latest
            .write()
            .map_err(|err| TrackingError::Poisoned(err.to_string()))?;
        latest.insert(technician, ping);
        drop(latest);

        // A send error only means nobody is subscribed right now.
        let _ = self.feed.send(ping);
        tracing::trace!(technician = %technician, position = %position, "location ping");
        Ok(ping)
    }

    /// Returns the latest ping for a technician, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Poisoned`] when the registry lock is
    /// poisoned.
    pub fn latest(&self, technician: UserId) -> Result<Option<LocationPing>, TrackingError> {
        let latest = self
            .latest
            .read()
            .map_err(|err| TrackingError::Poisoned(err.to_string()))?;
        Ok(latest.get(&technician).copied())
    }

    /// Returns the latest ping of every tracked technician.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Poisoned`] when the registry lock is
    /// poisoned.
    pub fn snapshot(&self) -> Result<Vec<LocationPing>, TrackingError> {
        let latest = self
            .latest
            .read()
            .map_err(|err| TrackingError::Poisoned(err.to_string()))?;
        let mut pings: Vec<LocationPing> = latest.values().copied().collect();
        pings.sort_by_key(|ping| ping.technician().into_inner());
        Ok(pings)
    }

    /// Subscribes to the update feed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LocationPing> {
        self.feed.subscribe()
    }
}

impl TechnicianLocator for LocationRegistry {
    fn locate(&self, technician: UserId) -> Option<GeoPoint> {
        self.latest(technician)
            .ok()
            .flatten()
            .map(|ping| ping.position())
    }
}
