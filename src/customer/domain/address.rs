//! Validated postal address value object.

use super::CustomerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length bounds for postal codes; covers US ZIP+4 and common international
/// formats.
const POSTAL_CODE_LENGTH: std::ops::RangeInclusive<usize> = 3..=12;

/// A structured street address for a customer site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    street: String,
    city: String,
    state: String,
    postal_code: String,
}

impl PostalAddress {
    /// Creates a validated postal address.
    ///
    /// All components are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerDomainError::EmptyAddressComponent`] for any empty
    /// component and [`CustomerDomainError::InvalidPostalCode`] when the
    /// postal code violates the accepted shape.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Result<Self, CustomerDomainError> {
        let street = non_empty("street", street.into())?;
        let city = non_empty("city", city.into())?;
        let state = non_empty("state", state.into())?;
        let postal_code = validated_postal_code(postal_code.into())?;

        Ok(Self {
            street,
            city,
            state,
            postal_code,
        })
    }

    /// Returns the street line.
    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the state or region.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} {}",
            self.street, self.city, self.state, self.postal_code
        )
    }
}

fn non_empty(
    component: &'static str,
    value: String,
) -> Result<String, CustomerDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CustomerDomainError::EmptyAddressComponent(component));
    }
    Ok(trimmed.to_owned())
}

fn validated_postal_code(value: String) -> Result<String, CustomerDomainError> {
    let trimmed = value.trim();
    let length_ok = POSTAL_CODE_LENGTH.contains(&trimmed.chars().count());
    let shape_ok = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ');

    if !length_ok || !shape_ok {
        return Err(CustomerDomainError::InvalidPostalCode(value));
    }
    Ok(trimmed.to_owned())
}
