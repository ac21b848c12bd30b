//! Provider records and their validated construction.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::location::{CoordinateError, GeoPoint};

/// Unique, store-assigned identifier of a provider record.
///
/// Stores hand out identifiers in increasing order and never reuse them, so
/// ordering by id is the same as ordering by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ProviderId(u64);

impl ProviderId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ProviderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Errors returned when a provider fails validation on create.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A required text field was absent or blank.
    #[error("{field} is required")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// The supplied location is not a valid WGS84 coordinate.
    #[error("invalid location: {0}")]
    InvalidLocation(#[from] CoordinateError),
}

/// A validated provider awaiting insertion.
///
/// Only [`NewProvider::new`] builds this type, so everything a store accepts
/// has already passed validation. Required text fields are trimmed; blank
/// optional contact fields become `None`.
///
/// # Examples
///
/// ```
/// use nearcare_core::{GeoPoint, NewProvider, ValidationError};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let draft = NewProvider::new(
///     " Dr. Rajesh Kumar ",
///     "Cardiology",
///     "Heart Care Center",
///     "123 MG Road, Bangalore",
///     GeoPoint::new(77.6033, 12.9716)?,
/// )?
/// .with_phone("+91-9876543210");
/// assert_eq!(draft.name(), "Dr. Rajesh Kumar");
///
/// let missing = NewProvider::new("", "Cardiology", "Clinic", "Road", GeoPoint::new(0.0, 0.0)?);
/// assert_eq!(missing, Err(ValidationError::MissingField { field: "name" }));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewProvider {
    name: String,
    specialty: String,
    organization_name: String,
    address: String,
    location: GeoPoint,
    phone: Option<String>,
    email: Option<String>,
}

impl NewProvider {
    /// Validates the required fields and constructs a draft record.
    pub fn new(
        name: impl Into<String>,
        specialty: impl Into<String>,
        organization_name: impl Into<String>,
        address: impl Into<String>,
        location: GeoPoint,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", name.into())?,
            specialty: required("specialty", specialty.into())?,
            organization_name: required("organizationName", organization_name.into())?,
            address: required("address", address.into())?,
            location,
            phone: None,
            email: None,
        })
    }

    /// Attach a contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = optional(phone.into());
        self
    }

    /// Attach a contact email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = optional(email.into());
        self
    }

    /// Provider display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Medical specialty.
    #[must_use]
    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    /// Clinic or organisation name.
    #[must_use]
    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    /// Registered street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Clinic location.
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        self.location
    }

    /// Optional phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Optional email address.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Stamp the draft with an identifier and creation time.
    ///
    /// Stores call this once per insert; `updated_at` starts equal to
    /// `created_at` because records are never edited in place.
    #[must_use]
    pub fn into_record(self, id: ProviderId, created_at: DateTime<Utc>) -> ProviderRecord {
        ProviderRecord {
            id,
            name: self.name,
            specialty: self.specialty,
            organization_name: self.organization_name,
            address: self.address,
            location: self.location,
            phone: self.phone,
            email: self.email,
            created_at,
            updated_at: created_at,
        }
    }
}

/// A provider stored in the directory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ProviderRecord {
    /// Store-assigned identifier.
    pub id: ProviderId,
    /// Provider display name.
    pub name: String,
    /// Medical specialty.
    pub specialty: String,
    /// Clinic or organisation name.
    pub organization_name: String,
    /// Registered street address.
    pub address: String,
    /// Clinic location as `(longitude, latitude)`.
    pub location: GeoPoint,
    /// Optional phone number.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub phone: Option<String>,
    /// Optional email address.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub email: Option<String>,
    /// When the store accepted the record.
    pub created_at: DateTime<Utc>,
    /// Last modification time; equal to `created_at` for every record.
    pub updated_at: DateTime<Utc>,
}

impl ProviderRecord {
    /// Re-run draft validation over a stored record.
    ///
    /// Used by stores that read records back from external storage, where the
    /// rows may have been edited outside this crate.
    pub fn revalidate(&self) -> Result<(), ValidationError> {
        NewProvider::new(
            self.name.as_str(),
            self.specialty.as_str(),
            self.organization_name.as_str(),
            self.address.as_str(),
            self.location,
        )
        .map(drop)
    }
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
