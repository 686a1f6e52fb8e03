//! Customer aggregate root.

use super::{CustomerDomainError, CustomerId, PostalAddress};
use crate::geo::GeoPoint;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a customer name, matching the `VARCHAR(200)` column.
const MAX_CUSTOMER_NAME_LENGTH: usize = 200;

/// Validated customer name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerName(String);

impl CustomerName {
    /// Creates a validated customer name.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerDomainError::EmptyCustomerName`] when the value is
    /// empty after trimming or [`CustomerDomainError::CustomerNameTooLong`]
    /// when it exceeds 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, CustomerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CustomerDomainError::EmptyCustomerName);
        }
        if trimmed.chars().count() > MAX_CUSTOMER_NAME_LENGTH {
            return Err(CustomerDomainError::CustomerNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the customer name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Customer aggregate root.
///
/// A customer owns zero or more jobs; coordinates are optional until a
/// geocode result is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    name: CustomerName,
    address: PostalAddress,
    coordinates: Option<GeoPoint>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted customer.
#[derive(Debug, Clone)]
pub struct PersistedCustomerData {
    /// Persisted customer identifier.
    pub id: CustomerId,
    /// Persisted customer name.
    pub name: CustomerName,
    /// Persisted postal address.
    pub address: PostalAddress,
    /// Persisted coordinates, if geocoded.
    pub coordinates: Option<GeoPoint>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer record.
    #[must_use]
    pub fn register(name: CustomerName, address: PostalAddress, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CustomerId::new(),
            name,
            address,
            coordinates: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a customer from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCustomerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            address: data.address,
            coordinates: data.coordinates,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the customer identifier.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the customer name.
    #[must_use]
    pub const fn name(&self) -> &CustomerName {
        &self.name
    }

    /// Returns the postal address.
    #[must_use]
    pub const fn address(&self) -> &PostalAddress {
        &self.address
    }

    /// Returns the geocoded coordinates, if any.
    #[must_use]
    pub const fn coordinates(&self) -> Option<GeoPoint> {
        self.coordinates
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the customer.
    pub fn rename(&mut self, name: CustomerName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Replaces the postal address and clears stale coordinates.
    ///
    /// Coordinates geocoded from the old address are meaningless for the
    /// new one, so a move always drops them until re-geocoded.
    pub fn relocate(&mut self, address: PostalAddress, clock: &impl Clock) {
        self.address = address;
        self.coordinates = None;
        self.touch(clock);
    }

    /// Writes back a geocode result.
    pub fn set_coordinates(&mut self, coordinates: GeoPoint, clock: &impl Clock) {
        self.coordinates = Some(coordinates);
        self.touch(clock);
    }

    /// Clears the geocoded coordinates.
    pub fn clear_coordinates(&mut self, clock: &impl Clock) {
        self.coordinates = None;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
